//! AWS provider for dcflow
//!
//! This crate implements the [`dcflow_cloud::Provider`] trait on top of the
//! AWS SDK, enabling dcflow to manage VPC datacenters on EC2 and their DNS
//! records on Route 53.
//!
//! # Features
//!
//! - VPCs, subnets, internet gateways and route tables
//! - Security groups and their ingress rules
//! - Instances, images and key pairs
//! - Route 53 `A` records in existing hosted zones
//!
//! # Requirements
//!
//! - `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and `AWS_DEFAULT_REGION`
//!   must be set (see [`dcflow_config::ProviderContext`])
//!
//! # Example
//!
//! ```ignore
//! use dcflow_cloud::Engine;
//! use dcflow_cloud_aws::AwsProvider;
//! use dcflow_config::ProviderContext;
//! use std::sync::Arc;
//!
//! let context = ProviderContext::from_env()?;
//! let provider = AwsProvider::from_context(&context).await;
//!
//! let engine = Engine::new(Arc::new(provider), credentials, template);
//! let report = engine.provision(&datacenter, &hosted_zone).await?;
//! ```

pub mod ec2;
pub mod error;
pub mod provider;
pub mod route53;

pub use error::classify;
pub use provider::AwsProvider;
