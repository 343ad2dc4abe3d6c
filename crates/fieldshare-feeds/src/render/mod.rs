//! RSS and Atom renderings of a feed page.
//!
//! Both are derived from the JSON feed structure and byte-for-byte
//! reproducible from it; nothing here consults the clock or any other
//! ambient state.

mod atom;
mod rss;

pub use atom::render_atom;
pub use rss::render_rss;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/// Sibling URL of a feed page in another representation:
/// `index.json` → `index.rss.xml` / `index.atom.xml`.
pub(crate) fn sibling_url(json_url: &str, kind: &str) -> String {
    json_url.replace(".json", &format!(".{kind}.xml"))
}

pub(crate) fn text_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
