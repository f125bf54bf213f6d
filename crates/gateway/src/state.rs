use std::collections::HashMap;
use std::sync::Arc;

use crate::auth::Aaa;
use crate::ports::{Pinger, SearchApi, UpdateApi};

/// Everything a request handler can reach. The gateway is otherwise
/// stateless; tokens are self-contained.
pub struct AppState {
    pub aaa: Aaa,
    /// Downstream health probes, keyed by service name.
    pub pingers: HashMap<&'static str, Arc<dyn Pinger>>,
    pub search: Arc<dyn SearchApi>,
    pub update: Arc<dyn UpdateApi>,
}
