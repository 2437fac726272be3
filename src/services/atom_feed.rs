//! Atom feed of a subscriber's reservations
//!
//! Reservations arrive already authorized and privacy-filtered; this module
//! only writes the document.

use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use thiserror::Error;

use crate::config::Config;
use crate::types::ReservationView;

pub const ATOM_NAMESPACE: &str = "http://www.w3.org/2005/Atom";

/// Date format used inside entry summaries
const SUMMARY_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Feed-level metadata
#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub title: String,
    /// Site URL, also used as the feed id
    pub link: String,
    pub author: String,
}

impl FeedSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            title: config.feed_title.clone(),
            link: config.script_url.clone(),
            author: config.feed_author.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Failed to write feed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to write feed: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("Feed is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

type FeedWriter = Writer<Vec<u8>>;

/// Render reservations as an Atom document, one entry per reservation
pub fn render_atom_feed(
    settings: &FeedSettings,
    reservations: &[ReservationView],
    updated: DateTime<Utc>,
) -> Result<String, FeedError> {
    let mut writer = Writer::new(Vec::new());

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("feed").with_attributes([("xmlns", ATOM_NAMESPACE)]),
    ))?;

    write_text_element(&mut writer, "title", &settings.title)?;
    write_link(&mut writer, &settings.link)?;
    write_text_element(&mut writer, "id", &settings.link)?;
    write_text_element(&mut writer, "updated", &atom_date(updated))?;

    writer.write_event(Event::Start(BytesStart::new("author")))?;
    write_text_element(&mut writer, "name", &settings.author)?;
    writer.write_event(Event::End(BytesEnd::new("author")))?;

    for reservation in reservations {
        write_entry(&mut writer, reservation)?;
    }

    writer.write_event(Event::End(BytesEnd::new("feed")))?;

    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_entry(writer: &mut FeedWriter, reservation: &ReservationView) -> Result<(), FeedError> {
    writer.write_event(Event::Start(BytesStart::new("entry")))?;

    write_text_element(writer, "title", &reservation.summary)?;
    write_link(writer, &reservation.reservation_url)?;
    write_text_element(writer, "id", &reservation.reservation_url)?;
    write_text_element(writer, "updated", &atom_date(reservation.date_created))?;

    writer.write_event(Event::Start(
        BytesStart::new("summary").with_attributes([("type", "html")]),
    ))?;
    writer.write_event(Event::Text(BytesText::new(&entry_summary(reservation))))?;
    writer.write_event(Event::End(BytesEnd::new("summary")))?;

    writer.write_event(Event::End(BytesEnd::new("entry")))?;
    Ok(())
}

/// HTML body of an entry; reservation text is escaped before it is embedded
fn entry_summary(reservation: &ReservationView) -> String {
    format!(
        "<div><span>Start</span> {}</div>\
         <div><span>End</span> {}</div>\
         <div><span>Organizer</span> {}</div>\
         <div><span>Description</span> {}</div>",
        reservation.date_start.format(SUMMARY_DATE_FORMAT),
        reservation.date_end.format(SUMMARY_DATE_FORMAT),
        quick_xml::escape::escape(reservation.organizer.as_str()),
        quick_xml::escape::escape(reservation.description.as_str()),
    )
}

fn write_text_element(writer: &mut FeedWriter, name: &str, text: &str) -> Result<(), FeedError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_link(writer: &mut FeedWriter, href: &str) -> Result<(), FeedError> {
    writer.write_event(Event::Empty(
        BytesStart::new("link").with_attributes([("href", href)]),
    ))?;
    Ok(())
}

fn atom_date(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}
