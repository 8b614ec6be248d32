use rocket::http::Header;
use rocket::response::Responder;

#[catch(401)]
pub fn unauthorized_request_credentials() -> RequestBasicAuth {
    RequestBasicAuth::new()
}

struct RequestBasicAuthHeader;

impl<'h> From<RequestBasicAuthHeader> for Header<'h> {
    fn from(_: RequestBasicAuthHeader) -> Self {
        Header::new("WWW-Authenticate", r#"Basic realm="emails""#)
    }
}

#[derive(Responder)]
#[response(status = 401)]
pub struct RequestBasicAuth {
    inner: (),
    basic_auth: RequestBasicAuthHeader,
}

impl RequestBasicAuth {
    fn new() -> RequestBasicAuth {
        RequestBasicAuth {
            inner: (),
            basic_auth: RequestBasicAuthHeader,
        }
    }
}
