// Library root: the HTTP router and the socket driver, exposed so integration
// tests can serve them on an ephemeral port.

pub mod router;
pub mod socket;
