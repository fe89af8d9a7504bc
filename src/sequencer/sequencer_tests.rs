use super::*;
use crate::types::ControlType;

// Test Helpers
fn op(control_type: ControlType, offset: u32) -> TileColorOp {
    TileColorOp::new(control_type, offset)
}

fn add_times(sequencer: &mut ControlWordSequencer, op: TileColorOp, times: usize) {
    for _ in 0..times {
        sequencer.add(op).unwrap();
    }
}

/// Walks an address path through the table the way the decoder does and
/// returns the control word it lands on.
fn resolve(words: &[ControlWord], path: &AddressPath) -> ControlWord {
    let mut levels = path.outermost_first();
    let first = levels.next().expect("path must not be empty");
    let mut word = words[first.relative_offset as usize];
    for level in levels {
        let base = word
            .long_offset_target()
            .expect("inner levels must follow a long offset");
        word = words[(base + level.relative_offset) as usize];
    }
    word
}

fn outermost_levels(path: &AddressPath) -> Vec<(u8, u32)> {
    path.outermost_first()
        .map(|level| (level.bit_width, level.relative_offset))
        .collect()
}

#[test]
fn test_add_accepts_offset_at_param_limit() {
    let mut sequencer = ControlWordSequencer::new();
    assert!(sequencer
        .add(op(ControlType::Masked4Colors, CONTROL_WORD_PARAM_LIMIT))
        .is_ok());
    assert_eq!(sequencer.distinct_operations(), 1);
}

#[test]
fn test_add_rejects_offset_above_param_limit() {
    let mut sequencer = ControlWordSequencer::new();
    sequencer.add(op(ControlType::Masked4Colors, 1)).unwrap();

    let err = sequencer
        .add(op(ControlType::Masked4Colors, CONTROL_WORD_PARAM_LIMIT + 1))
        .unwrap_err();
    assert!(matches!(
        err,
        TilecastError::OffsetOutOfRange {
            offset: 4096,
            limit: 4095
        }
    ));
    assert_eq!(sequencer.distinct_operations(), 1);
    assert_eq!(sequencer.count_of(&op(ControlType::Masked4Colors, 1)), 1);
}

#[test]
fn test_frequency_order_with_offset_tie_break() {
    let a = op(ControlType::Masked16Colors, 50);
    let b = op(ControlType::Masked16Colors, 20);
    let c = op(ControlType::Masked16Colors, 10);

    let mut sequencer = ControlWordSequencer::new();
    add_times(&mut sequencer, b, 3);
    add_times(&mut sequencer, a, 5);
    add_times(&mut sequencer, c, 3);
    let sequence = sequencer.sequence().unwrap();

    assert_eq!(
        sequence.control_words(),
        &[
            ControlWord::of(12, ControlType::Masked16Colors, 50),
            ControlWord::of(12, ControlType::Masked16Colors, 10),
            ControlWord::of(12, ControlType::Masked16Colors, 20),
        ]
    );
    assert_eq!(outermost_levels(&sequence.address_path(&a).unwrap()), vec![(12, 0)]);
    assert_eq!(outermost_levels(&sequence.address_path(&c).unwrap()), vec![(12, 1)]);
    assert_eq!(outermost_levels(&sequence.address_path(&b).unwrap()), vec![(12, 2)]);
}

#[test]
fn test_type_breaks_remaining_ties() {
    let mut sequencer = ControlWordSequencer::new();
    sequencer.add(TileColorOp::skip()).unwrap();
    sequencer.add(op(ControlType::Masked2Colors, 0)).unwrap();
    sequencer.add(op(ControlType::SolidColor, 0)).unwrap();
    let sequence = sequencer.sequence().unwrap();

    let types: Vec<_> = sequence
        .control_words()
        .iter()
        .map(|word| word.control_type().unwrap())
        .collect();
    assert_eq!(
        types,
        vec![ControlType::SolidColor, ControlType::Masked2Colors, ControlType::Skip]
    );
}

#[test]
fn test_sequence_is_independent_of_insertion_order() {
    let ops: Vec<TileColorOp> = (0..40u32)
        .map(|i| op(ControlType::Masked8Colors, i % 13))
        .chain((0..25u32).map(|i| op(ControlType::Masked2Colors, i % 7)))
        .collect();

    let mut forward = ControlWordSequencer::with_bitstream_index_limit(5);
    for &o in &ops {
        forward.add(o).unwrap();
    }
    let mut backward = ControlWordSequencer::with_bitstream_index_limit(5);
    for &o in ops.iter().rev() {
        backward.add(o).unwrap();
    }

    let forward = forward.sequence().unwrap();
    let backward = backward.sequence().unwrap();
    assert_eq!(forward.control_words(), backward.control_words());
    for o in &ops {
        assert_eq!(forward.address_path(o), backward.address_path(o));
    }
}

#[test]
fn test_empty_sequencer_yields_empty_sequence() {
    let sequence = ControlWordSequencer::new().sequence().unwrap();
    assert!(sequence.is_empty());
    assert_eq!(sequence.operation_count(), 0);
    assert!(sequence.address_path(&TileColorOp::skip()).is_none());
}

#[test]
fn test_index_limit_defaults_and_clamps() {
    assert_eq!(
        ControlWordSequencer::with_bitstream_index_limit(0).bitstream_index_limit(),
        DEFAULT_BITSTREAM_INDEX_LIMIT
    );
    assert_eq!(
        ControlWordSequencer::with_bitstream_index_limit(0x2000).bitstream_index_limit(),
        DEFAULT_BITSTREAM_INDEX_LIMIT
    );
    assert_eq!(
        ControlWordSequencer::with_bitstream_index_limit(7).bitstream_index_limit(),
        7
    );
}

#[test]
fn test_overflow_chaining_with_small_limit() {
    let mut sequencer = ControlWordSequencer::with_bitstream_index_limit(3);
    let ops: Vec<TileColorOp> = (0..21u32).map(|i| op(ControlType::Masked2Colors, i)).collect();
    for (i, &o) in ops.iter().enumerate() {
        add_times(&mut sequencer, o, 100 - i);
    }
    let sequence = sequencer.sequence().unwrap();
    let words = sequence.control_words();

    // 21 operations plus two long offsets.
    assert_eq!(words.len(), 23);
    assert_eq!(sequence.nested_level_count(), 2);
    assert_eq!(words[3], ControlWord::long_offset(4));
    assert_eq!(words[19], ControlWord::long_offset(20));

    // Directly addressed entries.
    for i in 0..3 {
        assert_eq!(outermost_levels(&sequence.address_path(&ops[i]).unwrap()), vec![(12, i as u32)]);
        assert_eq!(words[i].bit_width(), 12);
    }
    // First nested level: 15 slots behind the 12-bit long offset.
    assert_eq!(
        outermost_levels(&sequence.address_path(&ops[3]).unwrap()),
        vec![(12, 3), (4, 0)]
    );
    assert_eq!(
        outermost_levels(&sequence.address_path(&ops[17]).unwrap()),
        vec![(12, 3), (4, 14)]
    );
    assert_eq!(words[4].bit_width(), 4);
    // Second nested level, reached through slot 15 of the first.
    assert_eq!(
        outermost_levels(&sequence.address_path(&ops[18]).unwrap()),
        vec![(12, 3), (4, 15), (4, 0)]
    );
    assert_eq!(
        outermost_levels(&sequence.address_path(&ops[20]).unwrap()),
        vec![(12, 3), (4, 15), (4, 2)]
    );

    for o in &ops {
        let word = resolve(words, &sequence.address_path(o).unwrap());
        assert_eq!(word.control_type(), Some(o.control_type));
        assert_eq!(word.parameter(), o.offset);
    }
}

#[test]
fn test_overflow_chaining_at_default_limit() {
    let mut sequencer = ControlWordSequencer::new();
    // 4096 sixteen-color ops plus 16 eight-color ops, all used once.
    for offset in 0..=CONTROL_WORD_PARAM_LIMIT {
        sequencer.add(op(ControlType::Masked16Colors, offset)).unwrap();
    }
    for offset in 0..16 {
        sequencer.add(op(ControlType::Masked8Colors, offset)).unwrap();
    }
    let sequence = sequencer.sequence().unwrap();
    let words = sequence.control_words();

    assert_eq!(sequence.operation_count(), 4112);
    assert_eq!(words.len(), 4114);
    assert!(words[..4095]
        .iter()
        .all(|word| !word.is_long_offset() && word.bit_width() == 12));
    assert_eq!(words[4095], ControlWord::long_offset(4096));
    assert!(words[4096..4111]
        .iter()
        .all(|word| !word.is_long_offset() && word.bit_width() == 4));
    assert_eq!(words[4111], ControlWord::long_offset(4112));
    assert!(words[4112..].iter().all(|word| word.bit_width() == 4));

    // With equal counts the order is by offset, so table entry `i >= 32` holds
    // the sixteen-color op at offset `i - 16`.
    let at = |entry: u32| op(ControlType::Masked16Colors, entry - 16);
    assert_eq!(outermost_levels(&sequence.address_path(&at(4094)).unwrap()), vec![(12, 4094)]);
    assert_eq!(
        outermost_levels(&sequence.address_path(&at(4095)).unwrap()),
        vec![(12, 4095), (4, 0)]
    );
    assert_eq!(
        outermost_levels(&sequence.address_path(&at(4109)).unwrap()),
        vec![(12, 4095), (4, 14)]
    );
    assert_eq!(
        outermost_levels(&sequence.address_path(&at(4110)).unwrap()),
        vec![(12, 4095), (4, 15), (4, 0)]
    );

    for offset in 0..16 {
        let o = op(ControlType::Masked8Colors, offset);
        let word = resolve(words, &sequence.address_path(&o).unwrap());
        assert_eq!(word.control_type(), Some(ControlType::Masked8Colors));
        assert_eq!(word.parameter(), offset);
    }
}

#[test]
fn test_address_path_bit_len() {
    let mut sequencer = ControlWordSequencer::with_bitstream_index_limit(1);
    add_times(&mut sequencer, op(ControlType::SolidColor, 1), 2);
    sequencer.add(op(ControlType::SolidColor, 2)).unwrap();
    let sequence = sequencer.sequence().unwrap();

    let direct = sequence.address_path(&op(ControlType::SolidColor, 1)).unwrap();
    let nested = sequence.address_path(&op(ControlType::SolidColor, 2)).unwrap();
    assert_eq!(direct.bit_len(), 12);
    assert_eq!(nested.bit_len(), 16);
    assert_eq!(nested.depth(), 2);
    assert_eq!(nested.leaf(), Some(&AddressLevel::new(4, 0)));
}
