use crate::{Diagnostic, SourceFile, Span};

fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    idx = idx.min(text.len());
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// Line number, column and full text of the line containing `span.start`.
fn excerpt(source: &SourceFile, span: Span) -> (u32, u32, &str) {
    let text = source.text.as_str();
    let start = floor_char_boundary(text, span.start.0 as usize);
    let (line, col) = source.text.line_col(start as u32);
    let line_start = text[..start].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line_end = text[start..]
        .find('\n')
        .map(|i| start + i)
        .unwrap_or(text.len());
    (line, col, &text[line_start..line_end])
}

fn push_caret_block(out: &mut String, gutter: &str, line_text: &str, col: u32, width: u32) {
    out.push('\n');
    out.push_str(gutter);
    out.push_str(line_text);
    out.push('\n');
    out.push_str(gutter);
    out.extend(std::iter::repeat_n(' ', col as usize));
    out.extend(std::iter::repeat_n('^', width.max(1) as usize));
}

pub fn render_diagnostic(source: &SourceFile, diag: &Diagnostic) -> String {
    let code_str = diag.code.map(|c| format!("[{c}]")).unwrap_or_default();
    let mut out = match diag.span {
        Some(span) => {
            let (line, col, line_text) = excerpt(source, span);
            let width = (span.len() as usize).min(line_text.len().saturating_sub(col as usize));
            let mut out = format!(
                "Error{}: {}:{}:{}: {}",
                code_str,
                source.name,
                line + 1,
                col + 1,
                diag.message
            );
            push_caret_block(&mut out, "  | ", line_text, col, width as u32);
            out
        }
        None => format!("Error{}: {}: {}", code_str, source.name, diag.message),
    };
    if let Some(s) = &diag.suggestion {
        out.push_str("\n  = suggestion: ");
        out.push_str(s);
    }
    out
}
