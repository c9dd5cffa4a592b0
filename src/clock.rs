use chrono::{DateTime, Local, NaiveDate};

/// Time source for the calculator and the reminder scan. Injectable so tests
/// run against fixed instants instead of wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
