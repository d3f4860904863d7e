//! MCP transport configuration.
//!
//! Two transports are supported:
//!
//! - **Stdio**: Default mode; the client launches the server as a subprocess
//! - **HTTP**: Streamable HTTP transport served at `/mcp`
//!
//! # Example
//!
//! ```ignore
//! use nanobanana_mcp_common::transport::TransportArgs;
//! use clap::Parser;
//!
//! #[derive(Parser)]
//! struct Args {
//!     #[command(flatten)]
//!     transport: TransportArgs,
//! }
//!
//! let transport = Args::parse().transport.into_transport();
//! ```

use clap::{Args, ValueEnum};
use std::fmt;

/// Default port for the HTTP transport.
pub const DEFAULT_PORT: u16 = 8080;

/// Transport used to talk to the MCP client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    /// JSON-RPC over stdin/stdout.
    #[default]
    Stdio,
    /// Streamable HTTP on the given port.
    Http {
        /// Port to listen on (0 picks a free port)
        port: u16,
    },
}

impl Transport {
    /// Create a new stdio transport.
    pub fn stdio() -> Self {
        Transport::Stdio
    }

    /// Create a new HTTP transport on the specified port.
    pub fn http(port: u16) -> Self {
        Transport::Http { port }
    }

    /// Check if this is a stdio transport.
    pub fn is_stdio(&self) -> bool {
        matches!(self, Transport::Stdio)
    }

    /// Get the port if this is a network transport.
    pub fn port(&self) -> Option<u16> {
        match self {
            Transport::Stdio => None,
            Transport::Http { port } => Some(*port),
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Stdio => write!(f, "stdio"),
            Transport::Http { port } => write!(f, "http (port {})", port),
        }
    }
}

/// Transport mode parsed from command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TransportMode {
    #[default]
    Stdio,
    Http,
}

/// Command-line arguments for transport configuration.
#[derive(Args, Debug, Clone)]
pub struct TransportArgs {
    /// Transport mode: stdio or http
    #[arg(long, value_enum, ignore_case = true, default_value_t = TransportMode::Stdio)]
    pub transport: TransportMode,

    /// Port for the HTTP transport (default: 8080, or from PORT env var)
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
}

impl TransportArgs {
    /// Convert command-line arguments into a Transport configuration.
    pub fn into_transport(self) -> Transport {
        match self.transport {
            TransportMode::Stdio => Transport::Stdio,
            TransportMode::Http => Transport::Http { port: self.port },
        }
    }
}

impl Default for TransportArgs {
    fn default() -> Self {
        Self {
            transport: TransportMode::Stdio,
            port: DEFAULT_PORT,
        }
    }
}
