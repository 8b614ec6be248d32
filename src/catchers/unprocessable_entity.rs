use rocket::response::status::BadRequest;
use rocket::Request;

/// Malformed JSON bodies and unparseable parameters surface as 422 in Rocket.
#[catch(422)]
pub fn unprocessable_entity_to_bad_request(_req: &Request) -> BadRequest<&'static str> {
    BadRequest("The request could not be understood.")
}
