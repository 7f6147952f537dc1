/// Database connection the VisTrails server should read the workflow from.
///
/// This is the *target* of a lookup, forwarded as the first three
/// positional arguments of every remote call. It is unrelated to the
/// address of the XML-RPC server itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbTarget {
    pub host: String,
    pub port: u16,
    pub db: String,
}

impl DbTarget {
    pub fn new(host: impl Into<String>, port: u16, db: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            db: db.into(),
        }
    }
}
