use chrono::{DateTime, Utc};

use crate::message::{Request, Response};
use crate::methods::executable::Executable;
use crate::methods::MethodError;

/// Validates an update and acknowledges it. Nothing is stored.
///
/// An update is valid when `path` and `body` are non-empty and `date` is a base-10 Unix
/// timestamp (seconds) that is not in the future.
#[derive(Debug, PartialEq)]
pub struct Update {
    pub path: Option<String>,
    pub date: Option<String>,
    pub body: Option<String>,
}

impl Update {
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        is_present(&self.path)
            && self
                .date
                .as_deref()
                .and_then(parse_unix_time)
                .is_some_and(|date| date <= now)
            && is_present(&self.body)
    }

    fn exec_at(self, now: DateTime<Utc>) -> Result<Response, MethodError> {
        if !self.is_valid_at(now) {
            return Err(MethodError::InvalidUpdate);
        }

        Ok(Response::success("Update was successful! "))
    }
}

impl Executable for Update {
    fn exec(self) -> Result<Response, MethodError> {
        self.exec_at(Utc::now())
    }
}

impl From<Request> for Update {
    fn from(request: Request) -> Self {
        Self {
            path: request.path,
            date: request.date,
            body: request.body,
        }
    }
}

fn is_present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.is_empty())
}

/// Parses epoch seconds. Timestamps outside the representable calendar range are rejected.
pub fn parse_unix_time(date: &str) -> Option<DateTime<Utc>> {
    let seconds = date.trim().parse::<i64>().ok()?;
    DateTime::from_timestamp(seconds, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::methods::Method;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn valid() -> Update {
        Update {
            path: Some(String::from("/x")),
            date: Some(String::from("1000000000")),
            body: Some(String::from("y")),
        }
    }

    #[test]
    fn parse_update() {
        let request = Request::new("UPDATE")
            .with_path("/x")
            .with_date("1000000000")
            .with_body("y");
        let cmd = Method::try_from(request).unwrap();

        assert_eq!(cmd, Method::Update(valid()));
    }

    #[test]
    fn valid_update() {
        assert!(valid().is_valid_at(now()));
        assert_eq!(
            valid().exec_at(now()),
            Ok(Response::success("Update was successful! "))
        );
    }

    #[test]
    fn timestamp_equal_to_now_is_valid() {
        let update = Update {
            date: Some(String::from("1700000000")),
            ..valid()
        };

        assert!(update.is_valid_at(now()));
    }

    #[test]
    fn future_timestamp_is_invalid() {
        let update = Update {
            date: Some(String::from("1700000001")),
            ..valid()
        };

        assert!(!update.is_valid_at(now()));
        assert_eq!(update.exec_at(now()), Err(MethodError::InvalidUpdate));
    }

    #[test]
    fn each_missing_field_invalidates() {
        let mutations: [fn(&mut Update); 10] = [
            |u: &mut Update| u.path = None,
            |u: &mut Update| u.path = Some(String::new()),
            |u: &mut Update| u.date = None,
            |u: &mut Update| u.date = Some(String::new()),
            |u: &mut Update| u.date = Some(String::from("yesterday")),
            |u: &mut Update| u.date = Some(String::from("1.5")),
            |u: &mut Update| u.date = Some(String::from("0x10")),
            |u: &mut Update| u.date = Some(String::from("99999999999999999999")),
            |u: &mut Update| u.body = None,
            |u: &mut Update| u.body = Some(String::new()),
        ];

        for mutate in mutations {
            let mut update = valid();
            mutate(&mut update);
            assert!(!update.is_valid_at(now()), "{:?}", update);
        }
    }

    #[test]
    fn parse_unix_time_accepts_sign_and_whitespace() {
        assert_eq!(
            parse_unix_time(" 1000000000 "),
            DateTime::from_timestamp(1_000_000_000, 0)
        );
        assert_eq!(parse_unix_time("+0"), DateTime::from_timestamp(0, 0));
        assert_eq!(
            parse_unix_time("-86400"),
            DateTime::from_timestamp(-86_400, 0)
        );
        assert_eq!(parse_unix_time(&i64::MAX.to_string()), None);
    }

    #[test]
    fn far_future_is_invalid_against_wall_clock() {
        let update = Update {
            date: Some(String::from("9999999999")),
            ..valid()
        };

        assert!(!update.is_valid());
        assert!(valid().is_valid());
    }
}
