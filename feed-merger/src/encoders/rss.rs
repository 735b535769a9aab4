use crate::rss_utils::feed::{preview, ELLIPSIS};
use crate::rss_utils::time::format_rfc1123;
use crate::types::{CanonicalItem, MergedFeed, MergerError, Result};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fmt::Display;

/// Characters of the item description carried into `<description>`.
pub const PREVIEW_CHARS: usize = 500;

/// Render the merged feed as an RSS 2.0 document.
pub fn encode_rss(feed: &MergedFeed) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_err)?;

    let mut rss_start = BytesStart::new("rss");
    rss_start.push_attribute(("version", "2.0"));
    writer.write_event(Event::Start(rss_start)).map_err(xml_err)?;
    writer.write_event(Event::Start(BytesStart::new("channel"))).map_err(xml_err)?;

    write_text_element(&mut writer, "title", &feed.meta.title)?;
    write_text_element(&mut writer, "description", &feed.meta.description)?;
    write_text_element(&mut writer, "lastBuildDate", &format_rfc1123(&feed.meta.last_updated))?;
    write_text_element(&mut writer, "generator", &feed.meta.generated_by)?;

    for item in &feed.items {
        write_item(&mut writer, item)?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel"))).map_err(xml_err)?;
    writer.write_event(Event::End(BytesEnd::new("rss"))).map_err(xml_err)?;

    let mut out = writer.into_inner();
    out.push(b'\n');
    Ok(out)
}

fn write_item(writer: &mut Writer<Vec<u8>>, item: &CanonicalItem) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("item"))).map_err(xml_err)?;

    write_cdata_element(writer, "title", item.title.as_deref().unwrap_or(""))?;
    if let Some(link) = &item.link {
        write_text_element(writer, "link", link)?;
    }

    let (mut description, truncated) = preview(&item.description, PREVIEW_CHARS);
    if truncated {
        description.push_str(ELLIPSIS);
    }
    write_cdata_element(writer, "description", &description)?;

    if let Some(ts) = item.effective_timestamp() {
        write_text_element(writer, "pubDate", &format_rfc1123(&ts))?;
    }
    if let Some(guid) = item.guid.as_ref().or(item.link.as_ref()) {
        write_text_element(writer, "guid", guid)?;
    }
    write_text_element(writer, "category", &item.category)?;
    write_text_element(writer, "source", &item.source)?;

    writer.write_event(Event::End(BytesEnd::new("item"))).map_err(xml_err)?;
    Ok(())
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    let clean = strip_control_chars(text);
    writer.write_event(Event::Start(BytesStart::new(name))).map_err(xml_err)?;
    writer.write_event(Event::Text(BytesText::new(&clean))).map_err(xml_err)?;
    writer.write_event(Event::End(BytesEnd::new(name))).map_err(xml_err)?;
    Ok(())
}

/// CDATA cannot contain `]]>`, so the content is split across sections
/// at each occurrence.
fn write_cdata_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    let clean = strip_control_chars(text);
    writer.write_event(Event::Start(BytesStart::new(name))).map_err(xml_err)?;
    for section in cdata_sections(&clean) {
        writer.write_event(Event::CData(BytesCData::new(section))).map_err(xml_err)?;
    }
    writer.write_event(Event::End(BytesEnd::new(name))).map_err(xml_err)?;
    Ok(())
}

fn cdata_sections(text: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find("]]>") {
        // keep "]]" in this section, start the next one with ">"
        sections.push(&rest[..pos + 2]);
        rest = &rest[pos + 2..];
    }
    sections.push(rest);
    sections
}

// XML 1.0 forbids most C0 control characters
fn strip_control_chars(input: &str) -> String {
    input
        .chars()
        .filter(|&c| matches!(c, '\t' | '\n' | '\r') || (c as u32) >= 0x20)
        .collect()
}

fn xml_err(e: impl Display) -> MergerError {
    MergerError::Xml(e.to_string())
}
