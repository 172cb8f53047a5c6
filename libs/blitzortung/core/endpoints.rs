use rand::seq::SliceRandom;

/// Fixed set of interchangeable feed servers
///
/// Every reconnect attempt picks afresh, so a failing server is not retried
/// with any particular preference.
#[derive(Debug, Clone)]
pub struct EndpointPool {
    endpoints: Vec<String>,
}

impl EndpointPool {
    pub fn new(endpoints: Vec<String>) -> Self {
        Self { endpoints }
    }

    /// Pick one endpoint uniformly at random
    ///
    /// Returns `None` only for an empty pool.
    pub fn pick(&self) -> Option<&str> {
        self.endpoints
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
    }
}
