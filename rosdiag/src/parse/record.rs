//! Multi-line record accumulation.
//!
//! `print detail` style output spreads one item over several lines and
//! separates items with blank lines, the `Flags:` legend, or a `#` header:
//!
//! ```text
//! Flags: X - disabled, E - established
//!  0 E name="peer1" instance=default remote-address=10.0.0.2
//!      remote-as=65001 state=established uptime=1d2h
//!
//!  1   name="peer2" instance=default remote-as=65002
//! ```
//!
//! The accumulator is a two-state machine. `Idle` until a line with fields
//! arrives, then `Accumulating` until a boundary line or end of input, at
//! which point the partial record is completed (or dropped) and the machine
//! returns to `Idle`.

use super::fields::{Fields, LineClass, classify};

/// A record under construction.
pub trait PartialRecord: Default {
    /// The finished record type.
    type Record;

    /// Merge one line's fields. Later lines overwrite earlier values.
    fn absorb(&mut self, fields: &Fields<'_>);

    /// Finish the record, or `None` if a required field was never seen.
    fn complete(self) -> Option<Self::Record>;
}

enum State<P> {
    Idle,
    Accumulating(P),
}

/// Run the accumulator over `text` and return completed records in input order.
pub fn collect_records<P: PartialRecord>(text: &str) -> Vec<P::Record> {
    let mut records = Vec::new();
    let mut state: State<P> = State::Idle;

    for line in text.lines() {
        state = match (classify(line), state) {
            (LineClass::Boundary, State::Accumulating(partial)) => {
                records.extend(partial.complete());
                State::Idle
            }
            (LineClass::Boundary, State::Idle) => State::Idle,
            (LineClass::Fields(fields), State::Idle) => {
                let mut partial = P::default();
                partial.absorb(&fields);
                State::Accumulating(partial)
            }
            (LineClass::Fields(fields), State::Accumulating(mut partial)) => {
                partial.absorb(&fields);
                State::Accumulating(partial)
            }
            (LineClass::Other, state) => state,
        };
    }

    if let State::Accumulating(partial) = state {
        records.extend(partial.complete());
    }

    records
}

/// Overwrite `slot` only when the line carried the key.
pub(super) fn set(slot: &mut Option<String>, value: Option<&str>) {
    if let Some(value) = value {
        *slot = Some(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Pair {
        a: Option<String>,
        b: Option<String>,
    }

    impl PartialRecord for Pair {
        type Record = (String, String);

        fn absorb(&mut self, fields: &Fields<'_>) {
            set(&mut self.a, fields.get("a"));
            set(&mut self.b, fields.get("b"));
        }

        fn complete(self) -> Option<Self::Record> {
            Some((self.a?, self.b?))
        }
    }

    #[test]
    fn test_record_spans_lines() {
        let records = collect_records::<Pair>("a=1\n  b=2\n\na=3 b=4");
        assert_eq!(
            records,
            vec![
                ("1".to_string(), "2".to_string()),
                ("3".to_string(), "4".to_string())
            ]
        );
    }

    #[test]
    fn test_boundary_resets_incomplete_record() {
        // "a=1" never gets its b; it must not leak into the next record.
        let records = collect_records::<Pair>("a=1\nFlags: x\nb=2\n#\na=3\nb=4");
        assert_eq!(records, vec![("3".to_string(), "4".to_string())]);
    }

    #[test]
    fn test_other_lines_do_not_break_records() {
        let records = collect_records::<Pair>("a=1\n;;; note\nb=2");
        assert_eq!(records, vec![("1".to_string(), "2".to_string())]);
    }

    #[test]
    fn test_set_keeps_earlier_value() {
        let mut slot = Some("1".to_string());
        set(&mut slot, None);
        assert_eq!(slot.as_deref(), Some("1"));
        set(&mut slot, Some("2"));
        assert_eq!(slot.as_deref(), Some("2"));
    }

    #[test]
    fn test_empty_input() {
        assert!(collect_records::<Pair>("").is_empty());
        assert!(collect_records::<Pair>("\n\nFlags: X\n").is_empty());
    }
}
