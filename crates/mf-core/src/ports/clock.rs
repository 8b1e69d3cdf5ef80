use chrono::NaiveDate;

pub trait ClockPort: Send + Sync {
    fn today(&self) -> NaiveDate;
}
