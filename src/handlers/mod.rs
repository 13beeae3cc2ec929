pub mod rpc;
pub mod web;
