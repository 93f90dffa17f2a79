pub mod echo;
pub mod executable;
pub mod update;

use std::str::FromStr;
use strum_macros::{Display, EnumString};
use thiserror::Error as ThisError;

use crate::message::{Request, Response};
use crate::methods::executable::Executable;

use echo::Echo;
use update::Update;

/// Method names a client may send. Matching is ASCII case-insensitive.
///
/// `Create`, `Read` and `Delete` are known names without an implementation; they are answered
/// the same way as unknown names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MethodName {
    Create,
    Read,
    Update,
    Delete,
    Echo,
}

#[derive(Debug, PartialEq)]
pub enum Method {
    Update(Update),
    Echo(Echo),
}

impl Executable for Method {
    fn exec(self) -> Result<Response, MethodError> {
        match self {
            Method::Update(cmd) => cmd.exec(),
            Method::Echo(cmd) => cmd.exec(),
        }
    }
}

impl TryFrom<Request> for Method {
    type Error = MethodError;

    fn try_from(mut request: Request) -> Result<Self, Self::Error> {
        let method = match request.method.take() {
            Some(method) if !method.is_empty() => method,
            _ => return Err(MethodError::InvalidFormat),
        };

        let name =
            MethodName::from_str(&method).map_err(|_| MethodError::UnknownMethod { method })?;

        match name {
            MethodName::Update => Ok(Method::Update(Update::from(request))),
            MethodName::Echo => Ok(Method::Echo(Echo::from(request))),
            MethodName::Create | MethodName::Read | MethodName::Delete => {
                Err(MethodError::UnknownMethod {
                    method: name.to_string(),
                })
            }
        }
    }
}

/// Protocol level failures. The `Display` output is the exact message sent to the client.
#[derive(Debug, ThisError, PartialEq)]
pub enum MethodError {
    #[error("Invalid Request format")]
    InvalidFormat,
    #[error("Invalid update request format! ")]
    InvalidUpdate,
    #[error("Method not recognized! ")]
    UnknownMethod { method: String },
}

impl From<MethodError> for Response {
    fn from(err: MethodError) -> Self {
        Response::error(err.to_string())
    }
}
