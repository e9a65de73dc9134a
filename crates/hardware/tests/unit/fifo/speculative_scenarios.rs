//! Randomized equivalence and the corner-case scenarios.
//!
//! The randomized sweep throws arbitrary command sequences — writes,
//! reads, simultaneous write+read, command-only and idle cycles, with
//! every commit/discard combination on both sides — at the hardware model
//! and requires cycle-for-cycle agreement with the reference model at
//! several depths. The named tests pin down the scenarios the sweep is
//! unlikely to isolate: full-and-empty coexistence, the sticky latches,
//! the high-water mark, and the concrete depth-4 walkthrough.

use proptest::prelude::*;
use rtlblocks_core::blocks::fifo::{
    CommitCtl, SideCmd, SpecFifoInputs, SpeculativeFifo,
};
use rtlblocks_core::config::FifoConfig;

use crate::common::SpecFifoTester;

/// One randomized cycle of stimulus.
#[derive(Clone, Copy, Debug)]
enum Op {
    Write(u64),
    Read,
    WriteRead(u64),
    Command,
    Idle,
}

fn cmd_strategy() -> impl Strategy<Value = Option<SideCmd>> {
    prop_oneof![
        3 => Just(None),
        2 => Just(Some(SideCmd::Commit)),
        1 => Just(Some(SideCmd::Discard)),
        1 => Just(Some(SideCmd::DiscardCommit)),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let value = 0..128u64;
    prop_oneof![
        3 => value.clone().prop_map(Op::Write),
        3 => Just(Op::Read),
        2 => value.prop_map(Op::WriteRead),
        1 => Just(Op::Command),
        1 => Just(Op::Idle),
    ]
}

proptest! {
    #[test]
    fn random_sequences_match_the_reference(
        depth in prop::sample::select(vec![1usize, 2, 4, 7, 8, 9, 10]),
        ops in prop::collection::vec((op_strategy(), cmd_strategy(), cmd_strategy()), 0..160),
    ) {
        let mut t = SpecFifoTester::new(depth);
        t.check();
        let mut last_count_max = 0;

        for (op, wcmd, rcmd) in ops {
            match op {
                Op::Write(v) => t.write(v, wcmd, rcmd),
                Op::Read => {
                    let _ = t.read(wcmd, rcmd);
                }
                Op::WriteRead(v) => {
                    let _ = t.write_read(v, wcmd, rcmd);
                }
                Op::Command => t.command(wcmd, rcmd),
                Op::Idle => t.idle(),
            }

            // The high-water mark never decreases except across reset.
            let o = t.dut.outputs();
            prop_assert!(o.count_max >= last_count_max);
            prop_assert!(o.count_max >= o.count);
            last_count_max = o.count_max;
        }
    }

    #[test]
    fn reset_restarts_the_high_water_mark(
        fill in 1usize..=8,
        refill in 1usize..=4,
    ) {
        let mut t = SpecFifoTester::new(8);
        for v in 0..fill {
            t.write(v as u64, Some(SideCmd::Commit), None);
        }
        prop_assert_eq!(t.dut.outputs().count_max, fill);

        t.reset();
        prop_assert_eq!(t.dut.outputs().count_max, 0);

        for v in 0..refill {
            t.write(v as u64, Some(SideCmd::Commit), None);
        }
        prop_assert_eq!(t.dut.outputs().count_max, refill);
    }
}

#[test]
fn full_and_empty_coexist_under_dual_speculation() {
    // depth 4: two committed cells become two outstanding speculative
    // reads, and the two free cells two outstanding speculative writes.
    // Every cell is in flight: no room to write, nothing committed to
    // read.
    let mut t = SpecFifoTester::new(4);
    t.write(1, Some(SideCmd::Commit), None);
    t.write(2, Some(SideCmd::Commit), None);
    assert_eq!(t.read(None, None), Some(1));
    assert_eq!(t.read(None, None), Some(2));
    t.write(3, None, None);
    t.write(4, None, None);

    let o = t.dut.outputs();
    assert!(o.full, "no free cell for a new speculative write");
    assert!(o.empty, "no committed data left to read");
    assert_eq!(o.count, 4);

    // Committing both sides resolves the standoff: the speculative reads
    // free their cells, the speculative writes become readable.
    t.command(Some(SideCmd::Commit), Some(SideCmd::Commit));
    let o = t.dut.outputs();
    assert!(!o.full && !o.empty);
    assert_eq!(o.count, 2);
    assert_eq!(t.read(None, Some(SideCmd::Commit)), Some(3));
    assert_eq!(t.read(None, Some(SideCmd::Commit)), Some(4));
}

#[test]
fn sticky_latches_clear_only_on_reset() {
    let mut t = SpecFifoTester::new(2);
    // Overflow: write into a FIFO whose cells are all speculative.
    t.write(1, None, None);
    t.write(2, None, None);
    t.write(3, None, None);
    assert!(t.dut.outputs().ovf);
    // Underflow: read while nothing is committed.
    let _ = t.read(None, None);
    assert!(t.dut.outputs().udf);

    // Both latches survive a full drain-and-refill.
    t.command(Some(SideCmd::Discard), Some(SideCmd::Discard));
    t.write(4, Some(SideCmd::Commit), None);
    let _ = t.read(None, Some(SideCmd::Commit));
    let o = t.dut.outputs();
    assert!(o.ovf && o.udf);

    t.reset();
    let o = t.dut.outputs();
    assert!(!o.ovf && !o.udf);
}

/// The concrete walkthrough: depth 4, width 8.
#[test]
fn depth_four_walkthrough() {
    let mut f = SpeculativeFifo::new(&FifoConfig::new(4, 8)).unwrap();
    let pair = |cmd: CommitCtl| Some(cmd);

    // write(5) with immediate commit.
    f.tick(&SpecFifoInputs {
        we: true,
        din: 5,
        re: false,
        wr: pair(CommitCtl::COMMIT),
        rd: pair(CommitCtl::IDLE),
    });
    let o = f.outputs();
    assert_eq!((o.count, o.empty, o.full), (1, false, false));

    // write(6), write(7), write(8), all committed: full.
    for v in [6, 7, 8] {
        f.tick(&SpecFifoInputs {
            we: true,
            din: v,
            re: false,
            wr: pair(CommitCtl::COMMIT),
            rd: pair(CommitCtl::IDLE),
        });
    }
    let o = f.outputs();
    assert_eq!((o.count, o.full), (4, true));

    // read with immediate commit: hands out 5, frees a cell.
    assert_eq!(f.outputs().dout, 5);
    f.tick(&SpecFifoInputs {
        we: false,
        din: 0,
        re: true,
        wr: pair(CommitCtl::IDLE),
        rd: pair(CommitCtl::COMMIT),
    });
    let o = f.outputs();
    assert_eq!((o.count, o.full), (3, false));

    // write(9) discarded in the same cycle: never lands.
    f.tick(&SpecFifoInputs {
        we: true,
        din: 9,
        re: false,
        wr: pair(CommitCtl::DISCARD),
        rd: pair(CommitCtl::IDLE),
    });
    assert_eq!(f.outputs().count, 3);

    // read with immediate commit: hands out 6.
    assert_eq!(f.outputs().dout, 6);
    f.tick(&SpecFifoInputs {
        we: false,
        din: 0,
        re: true,
        wr: pair(CommitCtl::IDLE),
        rd: pair(CommitCtl::COMMIT),
    });
    assert_eq!(f.outputs().count, 2);
}
