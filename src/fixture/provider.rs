use crate::item::isbn13_check_digit;
use fake::faker::lorem::en::{Paragraph, Sentence};
use fake::faker::name::en::Name;
use fake::Fake;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 픽스처에 사용할 임의의 값을 만드는 트레이트
pub trait FakeProvider {

    /// 한 문장 길이의 임의 문자열
    fn sentence(&mut self) -> String;

    /// 사람 이름 형태의 임의 문자열
    fn name(&mut self) -> String;

    /// 여러 문장으로 이루어진 임의 문자열
    fn text(&mut self) -> String;

    /// `min` 이상 `max` 이하의 임의 정수
    fn number_between(&mut self, min: usize, max: usize) -> usize;

    /// 임의의 일시
    fn date_time(&mut self) -> chrono::NaiveDateTime;

    /// 체크 디지트가 올바른 ISBN-13 문자열
    fn isbn13(&mut self) -> String;
}

/// [`fake`] 크레이트와 [`StdRng`]를 사용하는 기본 [`FakeProvider`]
///
/// 같은 시드와 같은 기간으로 생성한 두 `FakerProvider`는 같은 순서로 같은 값을 만든다.
///
/// # Example
/// ```
/// use bookstore_fixture::fixture::provider::{FakeProvider, FakerProvider};
/// use bookstore_fixture::item::is_valid_isbn13;
///
/// let mut provider = FakerProvider::seeded(42);
/// let rating = provider.number_between(1, 5);
///
/// assert!((1..=5).contains(&rating));
/// assert!(is_valid_isbn13(&provider.isbn13()));
/// ```
pub struct FakerProvider {
    rng: StdRng,
    since: chrono::NaiveDateTime,
    until: chrono::NaiveDateTime,
}

impl FakerProvider {

    /// 시드를 지정한 provider를 만든다. 일시는 1970-01-01부터 2025-01-01 사이에서 만들어진다.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// 시드가 없으면 OS 엔트로피로 초기화 한다.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::with_rng(StdRng::from_entropy()),
        }
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            since: chrono::NaiveDateTime::default(),
            until: chrono::NaiveDate::from_ymd_opt(2025, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap_or_default(),
        }
    }

    /// 일시를 만들 기간을 지정한다. `since`가 `until`보다 늦으면 두 값을 바꾼다.
    pub fn between(mut self, since: chrono::NaiveDateTime, until: chrono::NaiveDateTime) -> Self {
        if since <= until {
            (self.since, self.until) = (since, until);
        } else {
            (self.since, self.until) = (until, since);
        }
        self
    }
}

impl FakeProvider for FakerProvider {
    fn sentence(&mut self) -> String {
        Sentence(3..8).fake_with_rng(&mut self.rng)
    }

    fn name(&mut self) -> String {
        Name().fake_with_rng(&mut self.rng)
    }

    fn text(&mut self) -> String {
        Paragraph(3..6).fake_with_rng(&mut self.rng)
    }

    fn number_between(&mut self, min: usize, max: usize) -> usize {
        if min <= max {
            self.rng.gen_range(min..=max)
        } else {
            self.rng.gen_range(max..=min)
        }
    }

    fn date_time(&mut self) -> chrono::NaiveDateTime {
        let since = self.since.and_utc().timestamp();
        let until = self.until.and_utc().timestamp();
        let secs = self.rng.gen_range(since..=until);

        chrono::DateTime::from_timestamp(secs, 0)
            .map(|d| d.naive_utc())
            .unwrap_or(self.since)
    }

    fn isbn13(&mut self) -> String {
        let mut digits = [0u8; 12];
        digits[..2].copy_from_slice(&[9, 7]);
        digits[2] = if self.rng.gen_bool(0.5) { 8 } else { 9 };
        for d in digits[3..].iter_mut() {
            *d = self.rng.gen_range(0..=9);
        }
        let check = isbn13_check_digit(&digits);

        digits.iter()
            .chain(std::iter::once(&check))
            .map(|d| char::from(b'0' + d))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::is_valid_isbn13;

    #[test]
    fn same_seed_makes_same_values() {
        let mut first = FakerProvider::seeded(7);
        let mut second = FakerProvider::seeded(7);

        for _ in 0..20 {
            assert_eq!(first.sentence(), second.sentence());
            assert_eq!(first.name(), second.name());
            assert_eq!(first.text(), second.text());
            assert_eq!(first.isbn13(), second.isbn13());
            assert_eq!(first.date_time(), second.date_time());
            assert_eq!(first.number_between(0, 99), second.number_between(0, 99));
        }
    }

    #[test]
    fn isbn13_is_always_valid() {
        let mut provider = FakerProvider::seeded(1);
        for _ in 0..1_000 {
            let isbn = provider.isbn13();
            assert_eq!(isbn.len(), 13);
            assert!(isbn.chars().all(|c| c.is_ascii_digit()));
            assert!(is_valid_isbn13(&isbn), "invalid isbn: {}", isbn);
        }
    }

    #[test]
    fn number_between_is_inclusive() {
        let mut provider = FakerProvider::seeded(3);
        let values: Vec<usize> = (0..500).map(|_| provider.number_between(1, 5)).collect();

        assert!(values.iter().all(|v| (1..=5).contains(v)));
        assert!(values.contains(&1));
        assert!(values.contains(&5));
        assert_eq!(provider.number_between(4, 4), 4);
        assert!((2..=6).contains(&provider.number_between(6, 2)));
    }

    #[test]
    fn date_time_stays_in_range() {
        let since = chrono::NaiveDate::from_ymd_opt(2010, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let until = chrono::NaiveDate::from_ymd_opt(2011, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let mut provider = FakerProvider::seeded(5).between(until, since);

        for _ in 0..200 {
            let date = provider.date_time();
            assert!(date >= since && date <= until);
        }
    }

    #[test]
    fn text_has_several_sentences() {
        let mut provider = FakerProvider::seeded(9);
        let text = provider.text();

        assert!(text.matches('.').count() >= 3, "text: {}", text);
    }
}
