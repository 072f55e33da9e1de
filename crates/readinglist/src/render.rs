use chrono::NaiveDate;

use crate::content::{Entry, MonthGroups};
use crate::date::DATE_FORMAT;
use crate::html::*;
use crate::SiteConfig;

/// Shown in place of an empty description.
pub const NO_DESCRIPTION: &str = "<none>";

pub fn anchor(text: impl Into<Node>, url: &str, new_tab: bool) -> HtmlElement {
    a().href(url)
        .rel("noopener")
        .target::<&str>(new_tab.then_some("_blank"))
        .child(text)
}

/// Renders the heading that sits above the listing.
pub fn render_heading(
    config: &SiteConfig,
    entry_count: usize,
    generated_on: NaiveDate,
) -> HtmlElement {
    let credit = anchor(
        code().child(config.repository.name.as_str()),
        config.repository.url.as_str(),
        false,
    );

    div()
        .class("heading")
        .child(h1().child(config.title.as_str()))
        .child(
            p().class("information")
                .child(config.description.as_str())
                .child(br())
                .child(format!(
                    "There are currently {entry_count} entries in the list"
                ))
                .child(br())
                .child(format!("Last modified {}", generated_on.format(DATE_FORMAT)))
                .child(br())
                .child("Repo: ")
                .child(credit),
        )
}

/// Renders every month group as a heading followed by a list of entries.
pub fn render_listing(config: &SiteConfig, groups: &MonthGroups) -> HtmlElement {
    div().children(groups.iter().flat_map(|group| {
        [
            h2().child(group.key.to_string()),
            ul().children(
                group
                    .entries
                    .iter()
                    .map(|entry| render_entry(config, entry)),
            ),
        ]
    }))
}

fn render_entry(config: &SiteConfig, entry: &Entry) -> HtmlElement {
    let title_line = summary()
        .child(anchor(
            entry.title.as_str(),
            &entry.url,
            config.open_links_in_new_tab,
        ))
        .child(format!(" - {}", entry.formatted_date()));

    let description = if entry.description.is_empty() {
        NO_DESCRIPTION
    } else {
        entry.description.as_str()
    };

    let image = (!entry.image.is_empty()).then(|| {
        div().child("Image:").child(br()).child(
            img()
                .src(entry.image.as_str())
                .attr("loading", "lazy")
                .style("max-width: 256px;"),
        )
    });

    let detailed_info = div()
        .class("description")
        .child(div().child("Description:").child(i().child(description)))
        .children(image);

    li().child(details().child(title_line).child(detailed_info))
}
