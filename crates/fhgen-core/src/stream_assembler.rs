//! Stream Assembler
//!
//! Drives the full O-RAN downlink stream: for every packet of the plan it
//! slices IQ samples from the pool, layers O-RAN → eCPRI → Ethernet, and
//! appends the finished frame to one output buffer. After the last frame
//! the remaining line-rate budget is filled with trailing IFG octets so the
//! stream length equals `total_bytes` exactly.
//!
//! Identifier advancement happens after each packet. The frame, subframe,
//! slot and symbol counters hold still while `packet_no` is 0, so both the
//! first and second packet of a run carry all-zero timing identifiers; the
//! eCPRI sequence id and the PRB cursor advance from the first packet on.
//! The eCPRI sequence id wraps modulo 255, not 256 — a preserved wire
//! property of this emitter, not a typo.

use crate::capacity_plan::StreamPlan;
use crate::config::Config;
use crate::ecpri;
use crate::ethernet_frame::{mac_bytes, FrameBuilder, IFG_OCTET};
use crate::iq_pool::IqPool;
use crate::oran_uplane::{self, UPlaneHeader};
use crate::types::{FhError, FhResult};

/// Per-packet identifier state.
///
/// One record with a single [`advance`](IdState::advance) operation; the
/// assembler reads the current values into each packet header, then
/// advances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdState {
    /// Radio frame, wraps mod 256.
    pub frame_id: u8,
    /// Subframe, wraps mod 10.
    pub subframe_id: u8,
    /// Slot, wraps mod `slots_per_subframe`.
    pub slot_id: u8,
    /// Symbol, wraps mod 14.
    pub symbol_id: u8,
    /// First PRB of the next packet, resets to 0 at `max_nrb`.
    pub start_prbu: u16,
    /// eCPRI sequence id, wraps mod 255.
    pub ecpri_seq_id: u16,
}

impl IdState {
    /// Advance the state after emitting packet `packet_no`.
    ///
    /// The timing block is skipped for `packet_no == 0`; the sequence id
    /// and PRB cursor always move.
    pub fn advance(&mut self, packet_no: u64, plan: &StreamPlan) {
        if packet_no != 0 {
            if packet_no % plan.packets_per_frame == 0 {
                self.frame_id = self.frame_id.wrapping_add(1);
            }
            if packet_no % plan.packets_per_subframe == 0 {
                self.subframe_id = (self.subframe_id + 1) % 10;
            }
            if packet_no % plan.packets_per_slot == 0 {
                self.slot_id = (self.slot_id + 1) % plan.slots_per_subframe as u8;
            }
            if packet_no % plan.packets_per_symbol == 0 {
                self.symbol_id = (self.symbol_id + 1) % 14;
            }
        }
        self.ecpri_seq_id = (packet_no % 255) as u16;
        self.start_prbu += plan.nrb_per_packet;
        if self.start_prbu >= plan.max_nrb {
            self.start_prbu = 0;
        }
    }
}

/// Assembles the complete capture-window byte stream.
pub struct StreamAssembler<'a> {
    plan: StreamPlan,
    pool: &'a IqPool,
    frames: FrameBuilder,
}

impl<'a> StreamAssembler<'a> {
    /// Create an assembler over a validated plan and a populated pool.
    pub fn new(cfg: &Config, plan: StreamPlan, pool: &'a IqPool) -> Self {
        let frames = FrameBuilder::new(
            mac_bytes(cfg.dest_mac),
            mac_bytes(cfg.src_mac),
            cfg.min_ifgs_per_packet as usize,
            cfg.max_packet_size as usize,
        );
        Self { plan, pool, frames }
    }

    /// The plan this assembler executes.
    pub fn plan(&self) -> &StreamPlan {
        &self.plan
    }

    /// Build the full stream: `total_packets` frames in strict packet order,
    /// then trailing IFG fill up to `total_bytes`.
    pub fn assemble(&self) -> FhResult<Vec<u8>> {
        let plan = &self.plan;
        if self.pool.is_empty() {
            return Err(FhError::PlanInfeasible("IQ pool is empty".to_string()));
        }

        tracing::info!(
            "Generating {} packets ({} per radio frame, {} bytes budget)",
            plan.total_packets,
            plan.packets_per_frame,
            plan.total_bytes
        );

        let mut out = Vec::with_capacity(plan.total_bytes as usize);
        let mut ids = IdState::default();

        // Scratch buffers, reused across the hot loop
        let mut iq: Vec<i8> = Vec::with_capacity(plan.iq_samples_per_packet as usize);
        let mut oran: Vec<u8> = Vec::new();
        let mut ether_payload: Vec<u8> = Vec::new();
        let mut frame: Vec<u8> = Vec::new();

        for packet_no in 0..plan.total_packets {
            self.pool.slice_into(
                packet_no * plan.iq_samples_per_packet,
                plan.iq_samples_per_packet as usize,
                &mut iq,
            );

            let header = UPlaneHeader {
                frame_id: ids.frame_id,
                subframe_id: ids.subframe_id,
                slot_id: ids.slot_id,
                symbol_id: ids.symbol_id,
                start_prbu: ids.start_prbu,
                num_prbu: plan.nrb_per_packet,
            };
            oran_uplane::build_packet_into(&header, &iq, &mut oran)?;
            ecpri::build_packet_into(ids.ecpri_seq_id, &oran, &mut ether_payload)?;

            let ether_size = (ether_payload.len() as u16).to_be_bytes();
            self.frames.build_into(ether_size, &ether_payload, &mut frame)?;
            out.extend_from_slice(&frame);

            ids.advance(packet_no, plan);
        }

        let emitted = out.len() as u64;
        if emitted > plan.total_bytes {
            return Err(FhError::PlanInfeasible(format!(
                "{emitted} frame octets exceed the {} byte line budget",
                plan.total_bytes
            )));
        }
        let trailing = plan.total_bytes - emitted;
        out.resize(plan.total_bytes as usize, IFG_OCTET);

        tracing::info!(
            "Generated {} octets ({} frame octets, {} trailing IFGs)",
            out.len(),
            emitted,
            trailing
        );
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capacity_plan::StreamPlan;
    use crate::config::Config;
    use crate::crc::{fcs_wire_bytes, Crc32};
    use crate::ecpri::EcpriHeader;
    use crate::ethernet_frame::PREAMBLE_SFD;

    const BASE: &str = "\
        Eth.LineRate=1\n\
        Eth.CaptureSizeMs=10\n\
        Eth.MinNumOfIFGsPerPacket=12\n\
        Eth.DestAddress=0x010101010101\n\
        Eth.SourceAddress=0x333333333333\n\
        Eth.MaxPacketSize=1500\n";

    fn config(oran: &str) -> Config {
        Config::parse_str(&format!("{BASE}{oran}")).unwrap()
    }

    fn small_config() -> Config {
        // 2 packets per symbol, 280 packets total, 224-octet frames
        config("Oran.SCS=15\nOran.MaxNrb=12\nOran.NrbPerPacket=6\n")
    }

    /// Split a stream into its fixed-size frames, discarding trailing IFGs.
    fn frames(stream: &[u8], frame_len: usize, count: usize) -> Vec<&[u8]> {
        (0..count)
            .map(|i| &stream[i * frame_len..(i + 1) * frame_len])
            .collect()
    }

    fn oran_header(frame: &[u8]) -> UPlaneHeader {
        // preamble 8 + macs 12 + size 2 + ecpri 8
        UPlaneHeader::parse(frame[30..38].try_into().unwrap())
    }

    fn assemble(cfg: &Config, pool: &IqPool) -> (StreamPlan, Vec<u8>) {
        let plan = StreamPlan::from_config(cfg).unwrap();
        let stream = StreamAssembler::new(cfg, plan, pool).assemble().unwrap();
        (plan, stream)
    }

    #[test]
    fn test_stream_length_equals_total_bytes() {
        let cfg = small_config();
        let pool = IqPool::from_samples(vec![0, 0]);
        let (plan, stream) = assemble(&cfg, &pool);
        assert_eq!(stream.len() as u64, plan.total_bytes);
        assert_eq!(plan.total_bytes, 1_250_000);
    }

    #[test]
    fn test_frame_count_and_trailing_ifg_accounting() {
        let cfg = small_config();
        let pool = IqPool::from_samples(vec![1, -1]);
        let (plan, stream) = assemble(&cfg, &pool);

        // iq 168 + oran 8 + ecpri 8 + eth overhead 26 = 210, + 12 IFGs = 222,
        // aligned to 224
        let frame_len = 224;
        assert_eq!(plan.total_packets, 280);

        for frame in frames(&stream, frame_len, plan.total_packets as usize) {
            assert_eq!(&frame[..8], &PREAMBLE_SFD);
            assert_eq!(frame.len() % 4, 0);
        }

        let emitted = frame_len * plan.total_packets as usize;
        assert!(stream[emitted..].iter().all(|&b| b == IFG_OCTET));
        assert_eq!(stream.len() - emitted, (plan.total_bytes as usize) - emitted);
    }

    #[test]
    fn test_first_frame_prefix() {
        let cfg = small_config();
        let pool = IqPool::from_samples(vec![0, 0]);
        let (_, stream) = assemble(&cfg, &pool);

        let mut expected = vec![0xFB, 0x55, 0x55, 0x55, 0x55, 0x55, 0x55, 0xD5];
        expected.extend_from_slice(&[0x01; 6]);
        expected.extend_from_slice(&[0x33; 6]);
        assert_eq!(&stream[..20], expected.as_slice());
    }

    #[test]
    fn test_every_fcs_verifies() {
        let cfg = small_config();
        let pool = IqPool::from_samples((-64..64).collect());
        let (plan, stream) = assemble(&cfg, &pool);

        let frame_len = 224;
        for frame in frames(&stream, frame_len, plan.total_packets as usize) {
            // FCS sits after preamble(8) + macs(12) + size(2) + ecpri payload
            let payload_len = u16::from_be_bytes([frame[20], frame[21]]) as usize;
            let fcs_at = 22 + payload_len;
            let expected = fcs_wire_bytes(Crc32::compute(&frame[8..fcs_at]));
            assert_eq!(&frame[fcs_at..fcs_at + 4], &expected);
        }
    }

    #[test]
    fn test_ecpri_length_and_sequence() {
        let cfg = small_config();
        let pool = IqPool::from_samples(vec![0, 0]);
        let (plan, stream) = assemble(&cfg, &pool);

        let frame_len = 224;
        for (p, frame) in frames(&stream, frame_len, plan.total_packets as usize)
            .iter()
            .enumerate()
        {
            let hdr = EcpriHeader::parse(frame[22..30].try_into().unwrap());
            // O-RAN header + IQ payload, eCPRI header excluded
            assert_eq!(hdr.payload_len as u64, 8 + plan.iq_samples_per_packet);

            let expected_seq = if p == 0 { 0 } else { ((p as u64 - 1) % 255) as u16 };
            assert_eq!(hdr.seq_id, expected_seq, "packet {p}");
        }
    }

    #[test]
    fn test_identifiers_hold_through_first_packet() {
        let cfg = config("Oran.SCS=15\nOran.MaxNrb=6\nOran.NrbPerPacket=6\n");
        let pool = IqPool::from_samples(vec![0, 0]);
        let (plan, stream) = assemble(&cfg, &pool);
        assert_eq!(plan.packets_per_symbol, 1);

        // iq 168 -> same 224-octet frames as the two-packet layout
        let frame_len = 224;
        let headers: Vec<_> = frames(&stream, frame_len, 6).iter().map(|f| oran_header(f)).collect();

        // symbol stays 0 for packets 0 and 1, then advances once per packet
        let symbols: Vec<u8> = headers.iter().map(|h| h.symbol_id).collect();
        assert_eq!(symbols, vec![0, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_symbol_and_subframe_periods() {
        let cfg = small_config();
        let pool = IqPool::from_samples(vec![0, 0]);
        let (plan, stream) = assemble(&cfg, &pool);

        let frame_len = 224;
        let headers: Vec<_> = frames(&stream, frame_len, plan.total_packets as usize)
            .iter()
            .map(|f| oran_header(f))
            .collect();

        for (p, hdr) in headers.iter().enumerate() {
            let p = p as u64;
            // advances seen by packet p happened at packet numbers 1..p
            let advances = |period: u64| if p == 0 { 0 } else { (p - 1) / period };
            assert_eq!(hdr.symbol_id as u64, advances(plan.packets_per_symbol) % 14, "packet {p}");
            assert_eq!(
                hdr.subframe_id as u64,
                advances(plan.packets_per_subframe) % 10,
                "packet {p}"
            );
            assert_eq!(hdr.frame_id, 0, "single radio frame run");
        }
    }

    #[test]
    fn test_slot_wraps_at_scs30() {
        let cfg = config("Oran.SCS=30\nOran.MaxNrb=6\nOran.NrbPerPacket=6\n");
        let pool = IqPool::from_samples(vec![0, 0]);
        let (plan, stream) = assemble(&cfg, &pool);
        assert_eq!(plan.slots_per_subframe, 2);

        let frame_len = 224;
        let headers: Vec<_> = frames(&stream, frame_len, plan.total_packets as usize)
            .iter()
            .map(|f| oran_header(f))
            .collect();

        for (p, hdr) in headers.iter().enumerate() {
            let p = p as u64;
            let advances = if p == 0 { 0 } else { (p - 1) / plan.packets_per_slot };
            assert_eq!(hdr.slot_id as u64, advances % 2, "packet {p}");
        }
        assert!(headers.iter().any(|h| h.slot_id == 1));
    }

    #[test]
    fn test_start_prbu_cycles() {
        let cfg = config("Oran.SCS=15\nOran.MaxNrb=273\nOran.NrbPerPacket=51\nEth.MaxPacketSize=1500\n");
        let pool = IqPool::from_samples(vec![0, 0]);
        let plan = StreamPlan::from_config(&cfg).unwrap();
        assert_eq!(plan.packets_per_symbol, 6);

        // iq 1428 + 16 + 26 = 1470 + 12 = 1482 -> 1484
        let frame_len = 1484;
        let stream = StreamAssembler::new(&cfg, plan, &pool).assemble().unwrap();
        let headers: Vec<_> = frames(&stream, frame_len, 13).iter().map(|f| oran_header(f)).collect();

        let prbs: Vec<u16> = headers.iter().map(|h| h.start_prbu).collect();
        assert_eq!(
            prbs,
            vec![0, 51, 102, 153, 204, 255, 0, 51, 102, 153, 204, 255, 0]
        );
    }

    #[test]
    fn test_iq_payload_draws_from_wrapped_cursor() {
        let cfg = small_config();
        let samples: Vec<i8> = (0..100).map(|v| (v - 50) as i8).collect();
        let pool = IqPool::from_samples(samples.clone());
        let (plan, stream) = assemble(&cfg, &pool);

        let frame_len = 224;
        let spp = plan.iq_samples_per_packet;
        for (p, frame) in frames(&stream, frame_len, plan.total_packets as usize)
            .iter()
            .enumerate()
        {
            let iq = &frame[38..38 + spp as usize];
            for (i, &octet) in iq.iter().enumerate() {
                let cursor = (p as u64 * spp + i as u64) % samples.len() as u64;
                assert_eq!(octet, samples[cursor as usize] as u8, "packet {p} offset {i}");
            }
        }
    }

    #[test]
    fn test_id_state_advance_is_pure_counter_logic() {
        let cfg = small_config();
        let plan = StreamPlan::from_config(&cfg).unwrap();
        let mut ids = IdState::default();

        ids.advance(0, &plan);
        assert_eq!(ids.symbol_id, 0);
        assert_eq!(ids.ecpri_seq_id, 0);
        assert_eq!(ids.start_prbu, 6);

        ids.advance(1, &plan);
        assert_eq!(ids.ecpri_seq_id, 1);
        assert_eq!(ids.start_prbu, 0);

        ids.advance(2, &plan);
        assert_eq!(ids.symbol_id, 1);
    }

    #[test]
    fn test_seq_id_wraps_mod_255() {
        let cfg = small_config();
        let plan = StreamPlan::from_config(&cfg).unwrap();
        let mut ids = IdState::default();
        ids.advance(254, &plan);
        assert_eq!(ids.ecpri_seq_id, 254);
        ids.advance(255, &plan);
        assert_eq!(ids.ecpri_seq_id, 0);
        ids.advance(510, &plan);
        assert_eq!(ids.ecpri_seq_id, 0);
    }

    #[test]
    fn test_overrunning_budget_is_infeasible() {
        // scs 30 doubles the packet count; 280 * 7688 octets overruns the
        // 1.25 MB budget of a 1 Gbps line
        let cfg = config("Oran.SCS=30\nOran.MaxNrb=273\nOran.NrbPerPacket=273\nEth.MaxPacketSize=8000\n");
        let pool = IqPool::from_samples(vec![0, 0]);
        let plan = StreamPlan::from_config(&cfg).unwrap();
        let err = StreamAssembler::new(&cfg, plan, &pool).assemble().unwrap_err();
        assert!(matches!(err, FhError::PlanInfeasible(_)));
    }

    #[test]
    fn test_oversized_frame_aborts_assembly() {
        let cfg = config("Oran.SCS=15\nOran.MaxNrb=273\nOran.NrbPerPacket=273\n");
        let pool = IqPool::from_samples(vec![0, 0]);
        let plan = StreamPlan::from_config(&cfg).unwrap();
        let err = StreamAssembler::new(&cfg, plan, &pool).assemble().unwrap_err();
        assert!(matches!(err, FhError::EthernetFrameTooLarge { .. }));
    }

    #[test]
    fn test_fixed_pool_stream_is_deterministic() {
        let cfg = small_config();
        let pool = IqPool::from_samples(vec![3, -3, 9, -9]);
        let (_, first) = assemble(&cfg, &pool);
        let (_, second) = assemble(&cfg, &pool);
        assert_eq!(first, second);
    }

    #[test]
    fn test_seeded_random_pool_stream_is_reproducible() {
        let cfg = small_config();
        let plan = StreamPlan::from_config(&cfg).unwrap();
        let pool_a = IqPool::random_seeded(plan.total_iq_samples(), 99);
        let pool_b = IqPool::random_seeded(plan.total_iq_samples(), 99);

        let a = StreamAssembler::new(&cfg, plan, &pool_a).assemble().unwrap();
        let b = StreamAssembler::new(&cfg, plan, &pool_b).assemble().unwrap();
        assert_eq!(a, b);
    }
}
