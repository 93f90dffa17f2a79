use serde::{Deserialize, Serialize};

/// A decoded client request. Every field is optional on the wire; which ones are required
/// depends on the method.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Request {
    pub method: Option<String>,
    pub path: Option<String>,
    pub date: Option<String>,
    pub body: Option<String>,
}

impl Request {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: Some(method.into()),
            ..Default::default()
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Response status as it appears on the wire.
///
/// The casing is asymmetric (`success` vs `Error`) and existing clients match on it, so it is
/// kept as is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "success")]
    Success,
    #[serde(rename = "Error")]
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Response {
    pub status: Status,
    pub body: String,
}

impl Response {
    pub fn success(body: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            body: body.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            body: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_full_request() {
        let json = r#"{"Method":"update","Path":"/x","Date":"1000000000","Body":"y"}"#;
        let request: Request = serde_json::from_str(json).unwrap();

        assert_eq!(
            request,
            Request::new("update")
                .with_path("/x")
                .with_date("1000000000")
                .with_body("y")
        );
    }

    #[test]
    fn missing_and_null_fields_are_absent() {
        let json = r#"{"Method":"echo","Body":null}"#;
        let request: Request = serde_json::from_str(json).unwrap();

        assert_eq!(request, Request::new("echo"));
    }

    #[test]
    fn field_names_are_case_sensitive() {
        let json = r#"{"method":"echo","body":"hello"}"#;
        let request: Request = serde_json::from_str(json).unwrap();

        assert_eq!(request, Request::default());
    }

    #[test]
    fn serialize_status_casing() {
        let ok = serde_json::to_string(&Response::success("hi")).unwrap();
        let err = serde_json::to_string(&Response::error("nope")).unwrap();

        assert_eq!(ok, r#"{"Status":"success","Body":"hi"}"#);
        assert_eq!(err, r#"{"Status":"Error","Body":"nope"}"#);
    }
}
