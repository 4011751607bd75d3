//! xmlq - jQuery-style queries over XML element trees
//!
//! Layers:
//! - core: memchr-accelerated scanning, entity decoding, attribute parsing
//! - reader: pull parser producing events from a byte slice
//! - dom: arena-based document tree with string interning and mutation
//! - query: node sets, axes, selectors, and the operation dispatcher
//!
//! The entry point is [`Document`]: load markup, take the root set, then
//! chain child lookups, selector searches, and set-level operations.

mod core;
mod document;
mod dom;
mod error;
mod query;
mod reader;

pub use document::Document;
pub use dom::{NodeId, NodeKind, XmlAttribute, XmlDocument, XmlNode, DOCUMENT_NODE};
pub use error::QueryError;
pub use query::{invoke, Arg, Axis, NodeSet, Selector, Value};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// A 12-book catalog in the shape commonly used for XML samples
    const BOOKS: &str = r#"<?xml version="1.0"?>
<catalog>
   <book id="bk101">
      <author>Gambardella, Matthew</author>
      <title>XML Developer's Guide</title>
      <genre>Computer</genre>
      <price>44.95</price>
      <publish_date>2000-10-01</publish_date>
      <description>An in-depth look at creating applications with XML.</description>
   </book>
   <book id="bk102">
      <author>Ralls, Kim</author>
      <title>Midnight Rain</title>
      <genre>Fantasy</genre>
      <price>5.95</price>
      <publish_date>2000-12-16</publish_date>
      <description>A former architect battles corporate zombies.</description>
   </book>
   <book id="bk103">
      <author>Corets, Eva</author>
      <title>Maeve Ascendant</title>
      <genre>Fantasy</genre>
      <price>5.95</price>
      <publish_date>2000-11-17</publish_date>
      <description>Young survivors lay the foundation for a new society.</description>
   </book>
   <book id="bk104">
      <author>Corets, Eva</author>
      <title>Oberon's Legacy</title>
      <genre>Fantasy</genre>
      <price>5.95</price>
      <publish_date>2001-03-10</publish_date>
      <description>A sequel to Maeve Ascendant.</description>
   </book>
   <book id="bk105">
      <author>Corets, Eva</author>
      <title>The Sundered Grail</title>
      <genre>Fantasy</genre>
      <price>5.95</price>
      <publish_date>2001-09-10</publish_date>
      <description>The two daughters of Maeve battle one another.</description>
   </book>
   <book id="bk106">
      <author>Randall, Cynthia</author>
      <title>Lover Birds</title>
      <genre>Romance</genre>
      <price>4.95</price>
      <publish_date>2000-09-02</publish_date>
      <description>When Carla meets Paul at an ornithology conference, tempers fly.</description>
   </book>
   <book id="bk107">
      <author>Thurman, Paula</author>
      <title>Splish Splash</title>
      <genre>Romance</genre>
      <price>4.95</price>
      <publish_date>2000-11-02</publish_date>
      <description>A deep sea diver finds true love twenty thousand leagues beneath the sea.</description>
   </book>
   <book id="bk108">
      <author>Knorr, Stefan</author>
      <title>Creepy Crawlies</title>
      <genre>Horror</genre>
      <price>4.95</price>
      <publish_date>2000-12-06</publish_date>
      <description>An anthology of horror stories about roaches, centipedes and spiders.</description>
   </book>
   <book id="bk109">
      <author>Kress, Peter</author>
      <title>Paradox Lost</title>
      <genre>Science Fiction</genre>
      <price>6.95</price>
      <publish_date>2000-11-02</publish_date>
      <description>After an inadvertant trip through a time warp, problems ensue.</description>
   </book>
   <book id="bk110">
      <author>O'Brien, Tim</author>
      <title>Microsoft .NET: The Programming Bible</title>
      <genre>Computer</genre>
      <price>36.95</price>
      <publish_date>2000-12-09</publish_date>
      <description>Microsoft's .NET initiative is explored in detail.</description>
   </book>
   <book id="bk111">
      <author>O'Brien, Tim</author>
      <title>MSXML3: A Comprehensive Guide</title>
      <genre>Computer</genre>
      <price>36.95</price>
      <publish_date>2000-12-01</publish_date>
      <description>The Microsoft MSXML3 parser is covered in detail.</description>
   </book>
   <book id="bk112">
      <author>Galos, Mike</author>
      <title>Visual Studio 7: A Comprehensive Guide</title>
      <genre>Computer</genre>
      <price>49.95</price>
      <publish_date>2001-04-16</publish_date>
      <description>Microsoft Visual Studio 7 is explored in depth.</description>
   </book>
</catalog>"#;

    fn books() -> Document {
        Document::from_xml(BOOKS).unwrap()
    }

    #[test]
    fn test_root_and_child() {
        let doc = books();
        assert_eq!(doc.root().name(doc.dom()), "catalog");
        assert_eq!(doc.child("catalog"), doc.root());
        assert!(doc.child("library").is_empty());
    }

    #[test]
    fn test_book_count() {
        let doc = books();
        assert_eq!(doc.select("catalog > book").count(), 12);
    }

    #[test]
    fn test_accepting_selectors() {
        let doc = books();
        for selector in [
            "catalog price",
            "catalog > book > price",
            "catalog book > price",
            "catalog > book price",
            "book > price",
            "book price",
        ] {
            assert_eq!(doc.select(selector).count(), 12, "selector {:?}", selector);
        }
    }

    #[test]
    fn test_rejecting_selectors() {
        let doc = books();
        for selector in [
            "cat_alog price",
            "catalog pri_ce",
            "price catalog",
            "catalog > price",
            "price > catalog",
        ] {
            assert_eq!(doc.select(selector).count(), 0, "selector {:?}", selector);
        }
    }

    #[test]
    fn test_id_selector() {
        let doc = books();
        let book = doc.select("#bk101");
        assert_eq!(book.count(), 1);
        assert_eq!(book.attr(doc.dom(), "id").unwrap(), "bk101");
        assert!(doc.select("#BK101").is_empty());
    }

    #[test]
    fn test_first_book_fields() {
        let doc = books();
        let first = doc.select("catalog > book").first();
        assert_eq!(first.child(doc.dom(), "author").value(doc.dom()), "Gambardella, Matthew");
        assert_eq!(first.child(doc.dom(), "title").value(doc.dom()), "XML Developer's Guide");
        assert_eq!(first.child(doc.dom(), "genre").value(doc.dom()), "Computer");
        assert_eq!(first.child(doc.dom(), "price").value(doc.dom()), "44.95");
        assert_eq!(
            first.child(doc.dom(), "publish_date").value(doc.dom()),
            "2000-10-01"
        );
    }

    #[test]
    fn test_path() {
        let doc = books();
        let prices = doc.select("catalog book price");
        assert_eq!(prices.path(doc.dom()), "catalog\\book\\price");
    }

    #[test]
    fn test_index_runs_in_order() {
        let doc = books();
        let books_set = doc.select("catalog > book");
        for pos in 0..books_set.count() {
            let book = books_set.nth(pos as i64).unwrap();
            assert_eq!(book.index(doc.dom()), pos as i64);
        }
        // The catalog's parent is the document container
        assert_eq!(doc.root().index(doc.dom()), -1);
    }

    #[test]
    fn test_random_covers_sibling_group() {
        let mut doc = books();
        let books_set = doc.select("catalog > book");
        let group_parent = doc
            .dom()
            .get_node(books_set.get(0).unwrap())
            .and_then(|n| n.parent);

        let mut seen = HashSet::new();
        for _ in 0..500 {
            let pick = invoke(doc.dom_mut(), &books_set, "random", vec![])
                .unwrap()
                .into_set()
                .unwrap();
            assert_eq!(pick.count(), 1);
            let node = pick.get(0).unwrap();
            assert_eq!(
                doc.dom().get_node(node).and_then(|n| n.parent),
                group_parent
            );
            seen.insert(node);
        }
        assert!(
            seen.len() as f64 >= 12.0 * 0.85,
            "only {} distinct positions over 500 trials",
            seen.len()
        );
    }

    #[test]
    fn test_attr_mutation_round_trip() {
        let mut doc = books();
        let root = doc.root();
        let echoed = invoke(
            doc.dom_mut(),
            &root,
            "attr",
            vec![Arg::str("edition"), Arg::str("2nd")],
        )
        .unwrap();
        assert_eq!(echoed, Value::Set(root.clone()));
        assert_eq!(root.attr(doc.dom(), "edition").unwrap(), "2nd");

        invoke(doc.dom_mut(), &root, "attr", vec![Arg::str("edition"), Arg::Null]).unwrap();
        assert_eq!(root.attr(doc.dom(), "edition").unwrap(), "");
    }

    #[test]
    fn test_case_permutations_agree() {
        let doc = books();
        let lower = doc.select("catalog book price");
        let mixed = doc.select("CaTaLoG BOOK Price");
        assert_eq!(lower, mixed);
    }
}
