pub(crate) mod fetch;

pub(crate) use fetch::fetch;

use batchfetch_lib::{Requests, ReqwestTransport};

use crate::options::Config;

/// Parameters passed to every command
pub(crate) struct CommandParams {
    pub(crate) transport: ReqwestTransport,
    pub(crate) requests: Requests,
    pub(crate) cfg: Config,
}
