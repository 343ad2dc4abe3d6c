//! RSS 2.0 rendering.

use std::io::Cursor;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::{sibling_url, text_element};
use crate::feed::Feed;
use crate::validate::FeedError;

/// Render one feed page as an RSS 2.0 document.
pub fn render_rss(feed: &Feed) -> Result<String, FeedError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    rss.push_attribute(("xmlns:atom", "http://www.w3.org/2005/Atom"));
    writer.write_event(Event::Start(rss))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    text_element(&mut writer, "title", &feed.title)?;
    text_element(
        &mut writer,
        "description",
        feed.description.as_deref().unwrap_or(""),
    )?;
    text_element(&mut writer, "link", &feed.home_page_url)?;

    let mut self_link = BytesStart::new("atom:link");
    self_link.push_attribute(("href", sibling_url(&feed.feed_url, "rss").as_str()));
    self_link.push_attribute(("rel", "self"));
    self_link.push_attribute(("type", "application/rss+xml"));
    writer.write_event(Event::Empty(self_link))?;

    for item in &feed.items {
        writer.write_event(Event::Start(BytesStart::new("item")))?;

        let mut guid = BytesStart::new("guid");
        guid.push_attribute(("isPermaLink", "false"));
        writer.write_event(Event::Start(guid))?;
        writer.write_event(Event::Text(BytesText::new(&item.id)))?;
        writer.write_event(Event::End(BytesEnd::new("guid")))?;

        text_element(&mut writer, "title", &item.title)?;
        if let Some(url) = &item.url {
            text_element(&mut writer, "link", url)?;
        }
        if let Some(text) = &item.content_text {
            text_element(&mut writer, "description", text)?;
        }
        if let Some(published) = item.date_published {
            text_element(&mut writer, "pubDate", &published.to_rfc2822())?;
        }

        writer.write_event(Event::End(BytesEnd::new("item")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;

    let bytes = writer.into_inner().into_inner();
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{FeedAuthor, FeedItem, FeedMeta, JSONFEED_VERSION};
    use chrono::DateTime;

    fn feed() -> Feed {
        Feed {
            version: JSONFEED_VERSION.to_string(),
            title: "Items".to_string(),
            description: Some("Observations".to_string()),
            author: FeedAuthor {
                name: "alice".to_string(),
                url: None,
            },
            home_page_url: "https://app.example/".to_string(),
            feed_url: "https://files.example/alice/_index/items/index.json".to_string(),
            next_url: "https://files.example/alice/_index/items/index_2.json".to_string(),
            items: vec![FeedItem {
                id: "https://files.example/alice/items/flickr/2020/1.yaml".to_string(),
                url: Some("https://app.example/item?i=x".to_string()),
                title: "Vulpes & friends".to_string(),
                content_text: Some("A fox".to_string()),
                date_published: Some(
                    DateTime::parse_from_rfc3339("2020-01-03T00:00:00+00:00").unwrap(),
                ),
                ..Default::default()
            }],
            meta: FeedMeta {
                item_count: 1,
                page_number: 1,
                page_count: 1,
            },
        }
    }

    #[test]
    fn renders_channel_and_items() {
        let xml = render_rss(&feed()).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<rss version=\"2.0\""));
        assert!(xml.contains("<title>Items</title>"));
        assert!(xml.contains("index.rss.xml"));
        assert!(xml.contains("<guid isPermaLink=\"false\">"));
        assert!(xml.contains("<pubDate>Fri, 3 Jan 2020 00:00:00 +0000</pubDate>"));
    }

    #[test]
    fn escapes_markup_in_titles() {
        let xml = render_rss(&feed()).unwrap();
        assert!(xml.contains("Vulpes &amp; friends"));
    }
}
