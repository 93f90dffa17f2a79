use crate::message::Response;
use crate::methods::MethodError;

pub trait Executable {
    fn exec(self) -> Result<Response, MethodError>;
}
