//! # fhgen-core
//!
//! Deterministic 5G fronthaul downlink stream assembler.
//!
//! Builds an offline byte stream that emulates a fronthaul downlink feed as
//! it would appear on an Ethernet line over a fixed capture window: O-RAN
//! User-Plane packets carrying IQ samples, wrapped in eCPRI and Ethernet,
//! padded with inter-frame gap octets so the emitted length exactly matches
//! what the configured line rate would transmit during the window.
//!
//! The pipeline is batch and single-threaded: parse configuration, derive a
//! capacity plan, build the IQ pool, assemble the stream, serialize it as
//! hex text.
//!
//! ```text
//! Config ──► StreamPlan ──► IqPool ──► StreamAssembler ──► hex_stream
//!                 │                         │
//!                 └── packet counts         └── O-RAN ► eCPRI ► Ethernet
//! ```
//!
//! ## Example
//!
//! ```rust
//! use fhgen_core::{Config, IqPool, StreamAssembler, StreamPlan};
//!
//! let cfg = Config::parse_str(
//!     "Eth.LineRate=1\nEth.CaptureSizeMs=10\nEth.MaxPacketSize=1500\n\
//!      Eth.MinNumOfIFGsPerPacket=12\nOran.SCS=15\nOran.MaxNrb=12\n\
//!      Oran.NrbPerPacket=6\n",
//! ).unwrap();
//! let plan = StreamPlan::from_config(&cfg).unwrap();
//! let pool = IqPool::from_samples(vec![1, -1]);
//!
//! let stream = StreamAssembler::new(&cfg, plan, &pool).assemble().unwrap();
//! assert_eq!(stream.len() as u64, plan.total_bytes);
//! ```

pub mod burst_stream;
pub mod capacity_plan;
pub mod config;
pub mod crc;
pub mod ecpri;
pub mod ethernet_frame;
pub mod hex_stream;
pub mod iq_pool;
pub mod oran_uplane;
pub mod stream_assembler;
pub mod types;

pub use burst_stream::{BurstAssembler, BurstPlan};
pub use capacity_plan::StreamPlan;
pub use config::{Config, PayloadType};
pub use iq_pool::IqPool;
pub use stream_assembler::{IdState, StreamAssembler};
pub use types::{FhError, FhResult};
