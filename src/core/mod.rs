//! 跨业务模块共享的 HTTP 基础设施

pub mod error;
pub mod middleware;
