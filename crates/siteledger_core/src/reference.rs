use rand::Rng;
use rand::distributions::Alphanumeric;
use time::OffsetDateTime;

const PREFIX: &str = "TRX";
const ID_SUFFIX_LEN: usize = 9;

fn unix_millis(now: OffsetDateTime) -> i128 {
    now.unix_timestamp_nanos() / 1_000_000
}

/// Human-facing reference: `TRX-<last six digits of unix millis>-<000..999>`.
pub fn transaction_reference(now: OffsetDateTime) -> String {
    transaction_reference_with(now, &mut rand::thread_rng())
}

pub fn transaction_reference_with<R: Rng>(now: OffsetDateTime, rng: &mut R) -> String {
    let millis = unix_millis(now).rem_euclid(1_000_000);
    let random: u16 = rng.gen_range(0..1000);
    format!("{PREFIX}-{millis:06}-{random:03}")
}

/// Storage id: `TRX-<unix millis>-<nine lowercase base-36 chars>`.
pub fn transaction_id(now: OffsetDateTime) -> String {
    transaction_id_with(now, &mut rand::thread_rng())
}

pub fn transaction_id_with<R: Rng>(now: OffsetDateTime, rng: &mut R) -> String {
    let suffix: String = rng
        .sample_iter(&Alphanumeric)
        .take(ID_SUFFIX_LEN)
        .map(|byte| char::from(byte).to_ascii_lowercase())
        .collect();
    format!("{PREFIX}-{}-{suffix}", unix_millis(now))
}

/// Ids for projects, tasks and documents: `<kind>-<unix nanos>-<4 hex>`.
pub fn record_id(kind: &str, now: OffsetDateTime) -> String {
    record_id_with(kind, now, &mut rand::thread_rng())
}

pub fn record_id_with<R: Rng>(kind: &str, now: OffsetDateTime, rng: &mut R) -> String {
    let salt: u16 = rng.r#gen();
    format!("{kind}-{}-{salt:04x}", now.unix_timestamp_nanos())
}

#[cfg(test)]
mod tests {
    use super::{record_id, record_id_with, transaction_id_with, transaction_reference_with};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use time::macros::datetime;

    #[test]
    fn reference_keeps_last_six_millis_digits() {
        let now = datetime!(2026-03-01 12:00:00.123 UTC);
        let mut rng = StdRng::seed_from_u64(7);
        let reference = transaction_reference_with(now, &mut rng);

        let parts: Vec<&str> = reference.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "TRX");
        let millis = (now.unix_timestamp_nanos() / 1_000_000) % 1_000_000;
        assert_eq!(parts[1], format!("{millis:06}"));
        assert_eq!(parts[2].len(), 3);
        assert!(parts[2].chars().all(|ch| ch.is_ascii_digit()));
    }

    #[test]
    fn id_has_base36_suffix() {
        let now = datetime!(2026-03-01 12:00:00 UTC);
        let mut rng = StdRng::seed_from_u64(11);
        let id = transaction_id_with(now, &mut rng);

        let (head, suffix) = id.rsplit_once('-').unwrap();
        assert_eq!(head, format!("TRX-{}", now.unix_timestamp() * 1000));
        assert_eq!(suffix.len(), 9);
        assert!(
            suffix
                .chars()
                .all(|ch| ch.is_ascii_digit() || ch.is_ascii_lowercase())
        );
    }

    #[test]
    fn seeded_rng_is_repeatable() {
        let now = datetime!(2026-03-01 12:00:00 UTC);
        let first = transaction_id_with(now, &mut StdRng::seed_from_u64(3));
        let second = transaction_id_with(now, &mut StdRng::seed_from_u64(3));
        assert_eq!(first, second);
    }

    #[test]
    fn record_id_prefixes_kind() {
        let now = datetime!(2026-03-01 12:00:00 UTC);
        let id = record_id("task", now);
        let (head, salt) = id.rsplit_once('-').unwrap();
        assert_eq!(head, format!("task-{}", now.unix_timestamp_nanos()));
        assert_eq!(salt.len(), 4);
        assert!(salt.chars().all(|ch| ch.is_ascii_hexdigit()));
    }

    #[test]
    fn seeded_record_id_is_repeatable() {
        let now = datetime!(2026-03-01 12:00:00 UTC);
        let first = record_id_with("doc", now, &mut StdRng::seed_from_u64(5));
        let again = record_id_with("doc", now, &mut StdRng::seed_from_u64(5));
        assert_eq!(first, again);
        assert!(first.starts_with(&format!("doc-{}-", now.unix_timestamp_nanos())));
    }
}
