use serde::{Serialize, Serializer};

/// One slot in a pagination control: either a concrete page number or an
/// elided run of pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(i64),
    Ellipsis,
}

impl Serialize for PageItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageItem::Page(n) => serializer.serialize_i64(*n),
            PageItem::Ellipsis => serializer.serialize_str("..."),
        }
    }
}

/// Map `(current_page, total_pages)` to the display sequence of page labels.
///
/// Seven or fewer pages fit without elision; otherwise the sequence keeps the
/// first and last pages visible and collapses the rest around the current
/// page. Inputs are expected to satisfy `1 <= current_page <= total_pages`;
/// behavior outside that range is unspecified.
pub fn generate_pagination(current_page: i64, total_pages: i64) -> Vec<PageItem> {
    use PageItem::{Ellipsis, Page};

    if total_pages <= 7 {
        return (1..=total_pages).map(Page).collect();
    }

    if current_page <= 3 {
        return vec![
            Page(1),
            Page(2),
            Page(3),
            Ellipsis,
            Page(total_pages - 1),
            Page(total_pages),
        ];
    }

    if current_page >= total_pages - 2 {
        return vec![
            Page(1),
            Page(2),
            Ellipsis,
            Page(total_pages - 2),
            Page(total_pages - 1),
            Page(total_pages),
        ];
    }

    vec![
        Page(1),
        Ellipsis,
        Page(current_page - 1),
        Page(current_page),
        Page(current_page + 1),
        Ellipsis,
        Page(total_pages),
    ]
}
