//! Property-based tests for rendering
//!
//! These generate random text and escape sequences and check the
//! guarantees a caller relies on: plain text is untouched, nothing panics,
//! and resets always land on the baseline.

use proptest::prelude::*;
use vtconsole::{
    Attributes, ConsoleDevice, ConsoleEvent, MemoryConsole, ParamOverflow, RenderConfig, Scanner, SgrParams,
    StyledWriter, Token,
};

fn writer(baseline: u16) -> StyledWriter<MemoryConsole> {
    StyledWriter::new(MemoryConsole::new(Attributes::from_bits(baseline)))
}

fn sgr_sequence() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::option::of(0u16..60), 0..7).prop_map(|values| {
        let params: Vec<String> = values
            .iter()
            .map(|v| v.map(|v| v.to_string()).unwrap_or_default())
            .collect();
        format!("\x1b[{}m", params.join(";"))
    })
}

proptest! {
    #[test]
    fn test_plain_text_is_unchanged(s in "[^\\x00\\x1b]{0,200}", baseline in any::<u16>()) {
        let mut w = writer(baseline);
        let n = w.render(&s).unwrap();
        prop_assert_eq!(n, s.len());
        prop_assert_eq!(w.device().output(), s.as_bytes());
        let changed = w
            .device()
            .events()
            .iter()
            .any(|e| matches!(e, ConsoleEvent::SetAttributes(_)));
        prop_assert!(!changed);
    }

    #[test]
    fn test_render_doesnt_panic(bytes in prop::collection::vec(any::<u8>(), 0..400)) {
        let mut w = writer(0x0007);
        let n = w.render(&bytes).unwrap();
        prop_assert!(n <= bytes.len());

        let config = RenderConfig::new().with_overflow(ParamOverflow::DropExcess);
        let mut w = StyledWriter::with_config(MemoryConsole::new(Attributes::from_bits(0x0007)), config);
        let _ = w.render(&bytes).unwrap();
    }

    #[test]
    fn test_output_is_input_without_sequences(
        parts in prop::collection::vec(("[a-z ]{0,10}", sgr_sequence()), 0..10),
    ) {
        let mut input = String::new();
        let mut text = String::new();
        for (literal, seq) in &parts {
            input.push_str(literal);
            input.push_str(seq);
            text.push_str(literal);
        }
        let mut w = writer(0x0007);
        w.render(&input).unwrap();
        prop_assert_eq!(w.device().output(), text.as_bytes());
    }

    #[test]
    fn test_reset_returns_to_baseline(
        seqs in prop::collection::vec(sgr_sequence(), 0..20),
        baseline in any::<u16>(),
    ) {
        let mut w = writer(baseline);
        for seq in &seqs {
            w.render(seq).unwrap();
        }
        w.render("\x1b[0m").unwrap();
        prop_assert_eq!(w.device().text_attributes(), Some(Attributes::from_bits(baseline)));
    }

    #[test]
    fn test_double_invert_is_identity(
        seqs in prop::collection::vec(sgr_sequence(), 0..10),
        baseline in any::<u16>(),
    ) {
        let mut w = writer(baseline);
        for seq in &seqs {
            w.render(seq).unwrap();
        }
        let before = w.device().text_attributes();
        w.render("\x1b[7m\x1b[7m").unwrap();
        prop_assert_eq!(w.device().text_attributes(), before);
    }

    #[test]
    fn test_colors_are_independent(fg in 30u16..37, bg in 40u16..47) {
        let mut w = writer(0x0007);
        w.render(format!("\x1b[{fg}m\x1b[{bg}m")).unwrap();
        let both = w.device().text_attributes().unwrap();

        let mut only_fg = writer(0x0007);
        only_fg.render(format!("\x1b[{fg}m")).unwrap();
        let mut only_bg = writer(0x0007);
        only_bg.render(format!("\x1b[{bg}m")).unwrap();

        prop_assert_eq!(both.foreground(), only_fg.device().text_attributes().unwrap().foreground());
        prop_assert_eq!(both.background(), only_bg.device().text_attributes().unwrap().background());
    }

    #[test]
    fn test_params_never_exceed_capacity(values in prop::collection::vec(0u16..100, 0..20)) {
        let body: Vec<String> = values.iter().map(u16::to_string).collect();
        let input = format!("\x1b[{}m", body.join(";"));
        for overflow in [ParamOverflow::Stop, ParamOverflow::DropExcess] {
            for token in Scanner::with_overflow(input.as_bytes(), overflow) {
                if let Some(params) = token.params() {
                    prop_assert!(params.len() <= SgrParams::CAPACITY);
                    let kept = values.len().clamp(1, SgrParams::CAPACITY);
                    prop_assert_eq!(params.len(), kept);
                    prop_assert_eq!(params.has_overrun(), values.len() > SgrParams::CAPACITY);
                }
            }
        }
    }

    #[test]
    fn test_detached_console_is_verbatim(s in "[^\\x00]{0,200}") {
        let mut w = StyledWriter::new(MemoryConsole::detached());
        let n = w.render(&s).unwrap();
        prop_assert_eq!(n, s.len());
        prop_assert_eq!(w.device().output(), s.as_bytes());
    }

    #[test]
    fn test_print_fmt_counts_everything(s in "[a-z]{0,64}", capacity in 0usize..80) {
        let config = RenderConfig::new().with_buffer_capacity(capacity);
        let mut w = StyledWriter::with_config(MemoryConsole::new(Attributes::from_bits(0x0007)), config);
        let n = w.print_fmt(format_args!("{s}")).unwrap();
        prop_assert_eq!(n, s.len());
        let kept = s.len().min(capacity.saturating_sub(1));
        prop_assert_eq!(w.device().output(), &s.as_bytes()[..kept]);
    }
}

#[test]
fn test_literal_tokens_are_never_empty() {
    let tokens: Vec<_> = Scanner::new(b"\x1b[1m\x1b[2m").collect();
    assert!(tokens
        .iter()
        .all(|t| !matches!(t, Token::Literal(bytes) if bytes.is_empty())));
    assert_eq!(tokens.len(), 2);
}
