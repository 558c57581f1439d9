mod common;

use common::TestContext;
use foodgram::utils::catalog_import_utils::{import_ingredients, import_tags, ImportReport};

#[test]
fn ingredients_load_once() {
    let ctx = TestContext::new();
    let data = "Salt,g\nSugar,g\nMilk,ml\nSalt,g\n";

    let report = import_ingredients(&mut ctx.conn(), data.as_bytes()).unwrap();
    assert_eq!(report, ImportReport { inserted: 3, skipped: 1 });

    let again = import_ingredients(&mut ctx.conn(), data.as_bytes()).unwrap();
    assert_eq!(again, ImportReport { inserted: 0, skipped: 4 });
    assert_eq!(ctx.count("ingredients"), 3);
}

#[test]
fn tags_keep_their_slug_unique() {
    let ctx = TestContext::new();
    ctx.tag("breakfast");
    let data = "name,color,slug\nBreakfast,#E26C2D,breakfast\nDinner,#8775D2,dinner\n";

    let report = import_tags(&mut ctx.conn(), data.as_bytes()).unwrap();
    assert_eq!(report, ImportReport { inserted: 1, skipped: 1 });
    assert_eq!(ctx.count("tags"), 2);
}

#[test]
fn a_bad_row_loads_nothing() {
    let ctx = TestContext::new();
    let data = "Salt,g\nPepper\n";

    assert!(import_ingredients(&mut ctx.conn(), data.as_bytes()).is_err());
    assert_eq!(ctx.count("ingredients"), 0);
}
