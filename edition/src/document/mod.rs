/*!
Paginated document output: styled runs are wrapped into rows, rows are
stacked onto fixed-size pages under the masthead, and the pages are
serialized as PDF.
*/

pub mod layout;
pub mod metrics;
pub mod paginate;
pub mod pdf;
pub mod render;
pub mod style;

pub use paginate::{paginate, DrawOp, Document, Masthead, Page, PageLayout, Paginator};
pub use pdf::{artifact_file_name, to_pdf, write_document};
pub use render::{render, Canvas, LinkStyle};
pub use style::{StyleStack, TextStyle};
