use crate::message::{Request, Response};
use crate::methods::executable::Executable;
use crate::methods::MethodError;

/// Returns the request body verbatim. An absent body is echoed as an empty string.
#[derive(Debug, PartialEq)]
pub struct Echo {
    pub body: String,
}

impl Executable for Echo {
    fn exec(self) -> Result<Response, MethodError> {
        Ok(Response::success(self.body))
    }
}

impl From<Request> for Echo {
    fn from(request: Request) -> Self {
        Self {
            body: request.body.unwrap_or_default(),
        }
    }
}
