// ABOUTME: Helpers for inspecting rendered PDFs in tests
// ABOUTME: Parses the output back and collects the text drawn on each page

use lopdf::content::Content;
use lopdf::{Document, Object};

pub(crate) fn page_count(bytes: &[u8]) -> usize {
    Document::load_mem(bytes).unwrap().get_pages().len()
}

/// Text operands of every `Tj`/`TJ` operator, one list per page
pub(crate) fn page_texts(bytes: &[u8]) -> Vec<Vec<String>> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
            content
                .operations
                .iter()
                .filter(|op| op.operator == "Tj" || op.operator == "TJ")
                .map(|op| op.operands.iter().map(operand_text).collect::<String>())
                .collect()
        })
        .collect()
}

fn operand_text(object: &Object) -> String {
    match object {
        Object::String(bytes, _) => String::from_utf8_lossy(bytes).into_owned(),
        Object::Array(items) => items.iter().map(operand_text).collect(),
        _ => String::new(),
    }
}
