/// Prepare complaint text for the model prompt.
///
/// Whitespace runs collapse to a single space, runs of ASCII control
/// characters (U+0000..=U+001F, U+007F) become a single space, and the result
/// is trimmed. Never fails; may return an empty string.
pub fn sanitize_text(text: &str) -> String {
    let mut without_controls = String::with_capacity(text.len());
    let mut in_control_run = false;
    for c in text.chars() {
        if is_ascii_control(c) {
            if !in_control_run {
                without_controls.push(' ');
                in_control_run = true;
            }
        } else {
            without_controls.push(c);
            in_control_run = false;
        }
    }

    collapse_whitespace(&without_controls).trim().to_string()
}

/// Whitespace-only cleanup applied to the text stored alongside a case.
pub fn sanitize_for_persistence(text: &str) -> String {
    collapse_whitespace(text).trim().to_string()
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_whitespace_run = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_whitespace_run {
                out.push(' ');
                in_whitespace_run = true;
            }
        } else {
            out.push(c);
            in_whitespace_run = false;
        }
    }
    out
}

fn is_ascii_control(c: char) -> bool {
    matches!(c, '\u{0000}'..='\u{001f}' | '\u{007f}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace_runs_and_trims() {
        assert_eq!(sanitize_text("  hola \n\n  mundo\t "), "hola mundo");
    }

    #[test]
    fn strips_control_characters() {
        assert_eq!(sanitize_text("pedido\u{0007}\u{0008}roto"), "pedido roto");
        assert_eq!(sanitize_text("\u{007f}fin"), "fin");
    }

    #[test]
    fn control_characters_next_to_spaces_leave_a_single_space() {
        assert_eq!(sanitize_text("a \u{0007} b"), "a b");
        assert_eq!(sanitize_text("mi pedido\u{0000} \u{001b} no llegó"), "mi pedido no llegó");
        assert_eq!(sanitize_text("uno\u{0007}\n\u{0008}dos"), "uno dos");
    }

    #[test]
    fn empty_and_blank_inputs_become_empty() {
        assert_eq!(sanitize_text(""), "");
        assert_eq!(sanitize_text(" \r\n\t "), "");
        assert_eq!(sanitize_text("\u{0001}\u{0002}"), "");
    }

    #[test]
    fn keeps_non_ascii_text_intact() {
        assert_eq!(sanitize_text("devolución   urgente ¡ya!"), "devolución urgente ¡ya!");
    }

    #[test]
    fn persistence_cleanup_only_touches_whitespace() {
        assert_eq!(sanitize_for_persistence("  quiero\n\ncancelar  "), "quiero cancelar");
    }
}
