//! # pathbind-core
//!
//! Path virtualization for a tracing sandbox.
//!
//! A traced program believes it runs inside an alternate root (the *guest*
//! view) while every filesystem access lands on the real (*host*)
//! filesystem. This crate provides:
//! - **Bindings**: an ordered table of host/guest path mappings.
//! - **Sanitization**: one-shot canonicalization of every guest side and
//!   bootstrap of its mount point on disk.
//! - **Substitution**: the per-syscall prefix rewrite between both views.
//! - **Translation**: full guest-to-host and host-to-guest path mapping
//!   built on top of substitution.
//!
//! The [`sandbox::Sandbox`] session value ties them together.

pub mod binding;
pub mod path;
pub mod sandbox;
