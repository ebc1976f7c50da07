use clap::Parser;
use clap::error::ErrorKind;
use siteledger_cli::cli::{
    Cli, Command, ConfigOverrideTarget, DocCommand, ProjectCommand, TaskCommand, TxnCommand,
    parse_config_override,
};
use siteledger_cli::render::{self, Renderer};
use siteledger_core::config::{self, Config, ConfigOverrides};
use siteledger_core::error::AppError;
use siteledger_core::ledger_api::{self, NewDocument, NewProject, NewTask, NewTransaction};
use siteledger_core::model::{PaymentMethod, TaskDuration};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_ENV_VAR: &str = "SITELEDGER_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn resolve_config(raw_overrides: &[String]) -> Result<Config, AppError> {
    let loaded = config::load_config_with_fallback();
    if let Some(err) = loaded.error {
        tracing::warn!(error = %err, "ignoring configuration file");
    }

    let mut overrides = ConfigOverrides::default();
    for raw in raw_overrides {
        let parsed = parse_config_override(raw).map_err(AppError::invalid_input)?;
        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::CurrencySymbol => overrides.currency_symbol = Some(parsed.value),
            ConfigOverrideTarget::PaymentMethod => {
                overrides.default_payment_method = Some(parsed.value.parse::<PaymentMethod>()?)
            }
        }
    }

    Ok(config::merge_overrides(&loaded.config, &overrides))
}

fn print_json(value: serde_json::Value) {
    println!("{value}");
}

fn run_project(command: ProjectCommand, json: bool, renderer: &Renderer) -> Result<(), AppError> {
    match command {
        ProjectCommand::Add {
            name,
            client,
            budget,
            deadline,
            status,
            team,
        } => {
            let project = ledger_api::create_project(NewProject {
                name,
                client,
                budget,
                deadline,
                status,
                team,
            })?;
            if json {
                print_json(serde_json::json!(project));
            } else {
                println!("Created project: {} ({})", project.name, project.id);
            }
        }
        ProjectCommand::List => {
            let projects = ledger_api::list_projects()?;
            if json {
                print_json(serde_json::json!(projects));
            } else {
                println!("{}", renderer.projects(&projects));
            }
        }
        ProjectCommand::Show { id } => {
            let summary = ledger_api::project_summary(&id)?;
            if json {
                print_json(render::project_summary_json(&summary));
            } else {
                println!("{}", renderer.project_summary(&summary));
            }
        }
    }

    Ok(())
}

fn run_task(command: TaskCommand, json: bool, renderer: &Renderer) -> Result<(), AppError> {
    match command {
        TaskCommand::Add {
            project_id,
            name,
            category,
            contract_value,
            estimated_cost,
            contractor,
            company,
            email,
            phone,
            start_date,
            duration,
            duration_unit,
        } => {
            let task = ledger_api::add_task(NewTask {
                project_id,
                name,
                category,
                contractor_name: contractor,
                company_name: company,
                contact_email: email,
                contact_phone: phone,
                start_date,
                duration: duration.map(|amount| TaskDuration {
                    amount,
                    unit: duration_unit,
                }),
                contract_value,
                estimated_cost,
            })?;
            if json {
                print_json(serde_json::json!(task));
            } else {
                println!(
                    "Added task: {} ({}) worth {}",
                    task.name,
                    task.id,
                    renderer.money(task.contract_value)
                );
            }
        }
        TaskCommand::List { project_id } => {
            let tasks = ledger_api::list_tasks(&project_id)?;
            if json {
                print_json(serde_json::json!(tasks));
            } else {
                println!("{}", renderer.tasks(&tasks));
            }
        }
        TaskCommand::Show { task_id } => {
            let payments = ledger_api::task_payments(&task_id)?;
            if json {
                print_json(render::task_payments_json(&payments));
            } else {
                println!("{}", renderer.task_payments(&payments));
            }
        }
    }

    Ok(())
}

fn run_txn(
    command: TxnCommand,
    json: bool,
    config: &Config,
    renderer: &Renderer,
) -> Result<(), AppError> {
    match command {
        TxnCommand::Add {
            project_id,
            amount,
            task,
            direction,
            method,
            status,
            date,
            description,
            category,
            reference,
            preview,
        } => {
            let amount = direction.apply(amount);
            if preview {
                let task_id =
                    task.ok_or_else(|| AppError::invalid_input("--preview needs --task"))?;
                let transition = ledger_api::preview_payment(&project_id, &task_id, amount)?;
                if json {
                    print_json(render::transition_json(&transition));
                } else {
                    println!("{}", renderer.transition(&transition, "Preview for task"));
                }
                return Ok(());
            }

            let recorded = ledger_api::record_transaction(NewTransaction {
                project_id,
                linked_task_id: task,
                amount,
                date,
                description,
                category,
                payment_method: method.unwrap_or_else(|| config.payment_method()),
                status,
                reference,
            })?;
            if json {
                print_json(render::recorded_json(&recorded));
            } else {
                println!("{}", renderer.recorded(&recorded));
            }
        }
        TxnCommand::List { project_id } => {
            let transactions = ledger_api::list_transactions(&project_id)?;
            if json {
                print_json(serde_json::json!(transactions));
            } else {
                println!("{}", renderer.transactions(&transactions));
            }
        }
    }

    Ok(())
}

fn run_doc(command: DocCommand, json: bool, renderer: &Renderer) -> Result<(), AppError> {
    match command {
        DocCommand::Add {
            project_id,
            name,
            main_category,
            sub_category,
            size_bytes,
            description,
            uploaded_by,
        } => {
            let document = ledger_api::add_document(NewDocument {
                project_id,
                name,
                main_category,
                sub_category,
                description,
                size_bytes,
                uploaded_by,
            })?;
            if json {
                print_json(serde_json::json!(document));
            } else {
                println!(
                    "Added document: {} ({}, {})",
                    document.name,
                    document.id,
                    document.size_label()
                );
            }
        }
        DocCommand::List { project_id } => {
            let documents = ledger_api::list_documents(&project_id)?;
            if json {
                print_json(serde_json::json!(documents));
            } else {
                println!("{}", renderer.documents(&documents));
            }
        }
    }

    Ok(())
}

fn run_command(cli: Cli) -> Result<(), AppError> {
    let config = resolve_config(&cli.config_override)?;
    let renderer = Renderer::new(&config);

    match cli.command {
        Command::Project { command } => run_project(command, cli.json, &renderer),
        Command::Task { command } => run_task(command, cli.json, &renderer),
        Command::Txn { command } => run_txn(command, cli.json, &config, &renderer),
        Command::Doc { command } => run_doc(command, cli.json, &renderer),
    }
}

fn main() {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_command(cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
