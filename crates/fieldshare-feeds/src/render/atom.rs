//! Atom rendering.

use std::io::Cursor;

use chrono::{DateTime, FixedOffset};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use super::{sibling_url, text_element};
use crate::feed::Feed;
use crate::validate::FeedError;

/// `<updated>` fallback for feeds whose items carry no dates. A fixed
/// value keeps the rendering reproducible from the JSON alone.
const EPOCH: &str = "1970-01-01T00:00:00+00:00";

fn feed_updated(feed: &Feed) -> String {
    feed.items
        .iter()
        .filter_map(|i| i.date_modified.or(i.date_published))
        .max()
        .as_ref()
        .map(DateTime::<FixedOffset>::to_rfc3339)
        .unwrap_or_else(|| EPOCH.to_string())
}

/// Render one feed page as an Atom document.
pub fn render_atom(feed: &Feed) -> Result<String, FeedError> {
    let atom_url = sibling_url(&feed.feed_url, "atom");

    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("feed");
    root.push_attribute(("xmlns", "http://www.w3.org/2005/Atom"));
    writer.write_event(Event::Start(root))?;

    text_element(&mut writer, "id", &atom_url)?;
    text_element(&mut writer, "title", &feed.title)?;
    if let Some(description) = &feed.description {
        if !description.is_empty() {
            text_element(&mut writer, "subtitle", description)?;
        }
    }
    text_element(&mut writer, "updated", &feed_updated(feed))?;

    let mut self_link = BytesStart::new("link");
    self_link.push_attribute(("href", atom_url.as_str()));
    self_link.push_attribute(("rel", "self"));
    self_link.push_attribute(("type", "application/atom+xml"));
    writer.write_event(Event::Empty(self_link))?;

    let mut alternate = BytesStart::new("link");
    alternate.push_attribute(("href", feed.home_page_url.as_str()));
    alternate.push_attribute(("rel", "alternate"));
    writer.write_event(Event::Empty(alternate))?;

    writer.write_event(Event::Start(BytesStart::new("author")))?;
    text_element(&mut writer, "name", &feed.author.name)?;
    if let Some(url) = &feed.author.url {
        text_element(&mut writer, "uri", url)?;
    }
    writer.write_event(Event::End(BytesEnd::new("author")))?;

    for item in &feed.items {
        writer.write_event(Event::Start(BytesStart::new("entry")))?;

        text_element(&mut writer, "id", &item.id)?;
        text_element(&mut writer, "title", &item.title)?;
        if let Some(url) = &item.url {
            let mut link = BytesStart::new("link");
            link.push_attribute(("href", url.as_str()));
            link.push_attribute(("rel", "alternate"));
            writer.write_event(Event::Empty(link))?;
        }
        let updated = item
            .date_modified
            .or(item.date_published)
            .as_ref()
            .map(DateTime::<FixedOffset>::to_rfc3339)
            .unwrap_or_else(|| EPOCH.to_string());
        text_element(&mut writer, "updated", &updated)?;
        if let Some(published) = item.date_published {
            text_element(&mut writer, "published", &published.to_rfc3339())?;
        }
        if let Some(text) = &item.content_text {
            let mut content = BytesStart::new("content");
            content.push_attribute(("type", "text"));
            writer.write_event(Event::Start(content))?;
            writer.write_event(Event::Text(quick_xml::events::BytesText::new(text)))?;
            writer.write_event(Event::End(BytesEnd::new("content")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("entry")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("feed")))?;

    let bytes = writer.into_inner().into_inner();
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
