pub mod balance;
pub mod error;
pub mod paging;

pub mod rpc {
    pub mod reader;
    pub mod wire;
}
