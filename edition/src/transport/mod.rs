/*!
Chat transport output: sections packed into size-budgeted pages, each page
rendered as message blocks with a plain-text fallback, and delivered through
a [`TransportClient`].
*/

pub mod blocks;
pub mod dispatch;
pub mod pager;

pub use blocks::{Block, PageChrome, TextObject};
pub use dispatch::{dispatch_pages, Delivery, DirectoryTransport, DispatchReport, TransportClient};
pub use pager::{build_pages, paginate_for_transport, PagerConfig, TransportPage};
