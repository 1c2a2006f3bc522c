//! Small, valid PDF documents built in memory for tests.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, StringFormat};

/// Where the first line of fixture text starts, in PDF user space:
/// 72pt in from the left edge, 72pt below the top of a letter page.
pub const DEFAULT_ORIGIN: (i64, i64) = (72, 720);

/// Build a PDF with one page per entry of `pages`, text at [`DEFAULT_ORIGIN`].
pub fn text_pdf(pages: &[&str]) -> Vec<u8> {
    text_pdf_at(pages, DEFAULT_ORIGIN)
}

/// Build a PDF with one page per entry of `pages`, each a 612x792 page whose
/// text starts at `origin`.
///
/// Text is set in Helvetica, one `Tj` per line; an empty string yields a page
/// with an empty content stream. Text should be ASCII, since the font uses
/// WinAnsiEncoding.
pub fn text_pdf_at(pages: &[&str], origin: (i64, i64)) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
        ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
    ]));
    let resources = Dictionary::from_iter(vec![(
        "Font",
        Object::Dictionary(Dictionary::from_iter(vec![("F1", Object::Reference(font_id))])),
    )]);

    let mut page_ids = Vec::with_capacity(pages.len());
    for text in pages {
        let content = Content {
            operations: text_operations(text, origin),
        };
        let encoded = content.encode().expect("encode fixture content stream");
        let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));

        let page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            ),
            ("Resources", Object::Dictionary(resources.clone())),
            ("Contents", Object::Reference(content_id)),
        ]);
        page_ids.push(doc.add_object(page));
    }

    let page_tree = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(page_ids.len() as i64)),
        (
            "Kids",
            Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
        ),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(page_tree));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("serialize fixture PDF");
    buffer
}

fn text_operations(text: &str, (x, y): (i64, i64)) -> Vec<Operation> {
    if text.is_empty() {
        return Vec::new();
    }
    let mut ops = vec![
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![Object::Name(b"F1".to_vec()), Object::Integer(12)],
        ),
        Operation::new("TL", vec![Object::Integer(14)]),
        Operation::new("Td", vec![Object::Integer(x), Object::Integer(y)]),
    ];
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            ops.push(Operation::new("T*", vec![]));
        }
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(
                line.as_bytes().to_vec(),
                StringFormat::Literal,
            )],
        ));
    }
    ops.push(Operation::new("ET", vec![]));
    ops
}
