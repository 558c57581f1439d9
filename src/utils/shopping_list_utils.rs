use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use diesel::prelude::*;
use diesel::SqliteConnection;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use crate::schema::{ingredients, recipe_ingredients, shopping_baskets};

pub const DOCUMENT_TITLE: &str = "Shopping list";
pub const FILENAME: &str = "shopping_list.pdf";

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_LEFT: f32 = 15.0;
const MARGIN_BOTTOM: f32 = 20.0;
const TITLE_Y: f32 = 280.0;
const FIRST_LINE_Y: f32 = 265.0;
const LINE_STEP: f32 = 10.0;
const TITLE_SIZE: f32 = 18.0;
const LINE_SIZE: f32 = 14.0;

/// One ingredient line of one basketed recipe.
#[derive(Queryable, Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListLine {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListItem {
    pub name: String,
    pub measurement_unit: String,
    pub total: i64,
}

/// Every ingredient line of every recipe in the user's basket, in basket
/// order and then recipe line order.
pub fn basket_lines(conn: &mut SqliteConnection, user_id: i32) -> QueryResult<Vec<ShoppingListLine>> {
    shopping_baskets::table
        .inner_join(
            recipe_ingredients::table.on(recipe_ingredients::recipe_id.eq(shopping_baskets::recipe_id)),
        )
        .inner_join(ingredients::table.on(ingredients::id.eq(recipe_ingredients::ingredient_id)))
        .filter(shopping_baskets::user_id.eq(user_id))
        .order((shopping_baskets::id, recipe_ingredients::id))
        .select((
            ingredients::name,
            ingredients::measurement_unit,
            recipe_ingredients::amount,
        ))
        .load(conn)
}

/// Sums amounts per (name, unit), keeping the order in which each pair was
/// first seen. The same name in two units stays two items.
pub fn aggregate<I>(lines: I) -> Vec<ShoppingListItem>
where
    I: IntoIterator<Item = ShoppingListLine>,
{
    let mut positions: HashMap<(String, String), usize> = HashMap::new();
    let mut items: Vec<ShoppingListItem> = Vec::new();

    for line in lines {
        let key = (line.name, line.measurement_unit);
        match positions.get(&key) {
            Some(&position) => items[position].total += i64::from(line.amount),
            None => {
                positions.insert(key.clone(), items.len());
                items.push(ShoppingListItem {
                    name: key.0,
                    measurement_unit: key.1,
                    total: i64::from(line.amount),
                });
            }
        }
    }

    items
}

/// `N. name - total, unit`, numbered from 1.
pub fn render_lines(items: &[ShoppingListItem]) -> Vec<String> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            format!(
                "{}. {} - {}, {}",
                index + 1,
                item.name,
                item.total,
                item.measurement_unit
            )
        })
        .collect()
}

/// Lays the numbered lines out top to bottom on A4 pages. Built-in fonts only
/// cover Latin-1, so `font_path` should point at a TTF with wider coverage
/// when ingredient names need it.
pub fn render_pdf(
    items: &[ShoppingListItem],
    font_path: Option<&Path>,
) -> Result<Vec<u8>, printpdf::Error> {
    let (doc, page, layer) = PdfDocument::new(
        DOCUMENT_TITLE,
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Page 1",
    );

    let font: IndirectFontRef = match font_path {
        Some(path) => doc.add_external_font(File::open(path)?)?,
        None => doc.add_builtin_font(BuiltinFont::Helvetica)?,
    };

    let mut current: PdfLayerReference = doc.get_page(page).get_layer(layer);
    current.use_text(DOCUMENT_TITLE, TITLE_SIZE, Mm(MARGIN_LEFT), Mm(TITLE_Y), &font);

    let mut y = FIRST_LINE_Y;
    let mut pages = 1;
    for line in render_lines(items) {
        if y < MARGIN_BOTTOM {
            pages += 1;
            let (page, layer) =
                doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), format!("Page {pages}"));
            current = doc.get_page(page).get_layer(layer);
            y = TITLE_Y;
        }
        current.use_text(line, LINE_SIZE, Mm(MARGIN_LEFT), Mm(y), &font);
        y -= LINE_STEP;
    }

    doc.save_to_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, unit: &str, amount: i32) -> ShoppingListLine {
        ShoppingListLine {
            name: name.into(),
            measurement_unit: unit.into(),
            amount,
        }
    }

    #[test]
    fn sums_by_name_in_first_seen_order() {
        let items = aggregate(vec![
            line("Salt", "g", 5),
            line("Salt", "g", 3),
            line("Sugar", "g", 10),
        ]);

        assert_eq!(
            render_lines(&items),
            vec!["1. Salt - 8, g".to_string(), "2. Sugar - 10, g".to_string()]
        );
    }

    #[test]
    fn order_follows_first_appearance_not_name_or_total() {
        let items = aggregate(vec![
            line("Zucchini", "pcs", 1),
            line("Apple", "pcs", 30),
            line("Zucchini", "pcs", 1),
        ]);

        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Zucchini", "Apple"]);
        assert_eq!(items[0].total, 2);
    }

    #[test]
    fn same_name_different_unit_stays_apart() {
        let items = aggregate(vec![line("Milk", "ml", 200), line("Milk", "cup", 1)]);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn totals_do_not_overflow_i32() {
        let items = aggregate(vec![line("Flour", "g", i32::MAX), line("Flour", "g", i32::MAX)]);
        assert_eq!(items[0].total, 2 * i64::from(i32::MAX));
    }

    #[test]
    fn empty_input_gives_no_items() {
        assert!(aggregate(Vec::new()).is_empty());
    }

    #[test]
    fn renders_a_pdf_document() {
        let items = aggregate(vec![line("Salt", "g", 5), line("Sugar", "g", 10)]);
        let bytes = render_pdf(&items, None).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn long_lists_spill_onto_more_pages() {
        let lines = (0..80).map(|i| line(&format!("Item {i}"), "g", 1));
        let bytes = render_pdf(&aggregate(lines), None).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
