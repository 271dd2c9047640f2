//! Per-kind resource accessors
//!
//! Each accessor wraps exactly one resource kind. Tagged kinds implement
//! [`crate::lookup::Accessor`]; relationship calls are plain methods and
//! are not idempotent on their own.

mod dns;
mod firewall;
mod gateway;
mod image;
mod instance;
mod key_pair;
mod network;
mod route_table;
mod subnet;

pub use dns::{DNS_RECORD_TTL, DnsAccessor};
pub use firewall::{FirewallGroupAccessor, FirewallGroupRequest};
pub use gateway::{GatewayAccessor, GatewayRequest};
pub use image::{ImageAccessor, ImageRequest};
pub use instance::{InstanceAccessor, InstanceRequest};
pub use key_pair::{KeyPairAccessor, KeyPairRequest};
pub use network::{NetworkAccessor, NetworkRequest};
pub use route_table::{DEFAULT_ROUTE_CIDR, RouteTableAccessor, RouteTableRequest};
pub use subnet::{SubnetAccessor, SubnetRequest};
