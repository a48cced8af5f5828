//! Rows, API views and query parameters shared by the server and the client.

use serde::{Deserialize, Serialize};

/// Material category a collection point may accept.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    pub id: i32,
    pub title: String,
    pub image: String,
}

/// Item as served to clients: the stored filename becomes a public URL.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemView {
    pub id: i32,
    pub title: String,
    pub image_url: String,
}

impl ItemView {
    pub fn new(item: Item, image_url: String) -> Self {
        ItemView {
            id: item.id,
            title: item.title,
            image_url,
        }
    }
}

/// A registered waste-collection point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Point {
    pub id: i32,
    pub image: String,
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub uf: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointView {
    #[serde(flatten)]
    pub point: Point,
    pub image_url: String,
}

/// `GET /points/:id` body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointDetail {
    pub point: PointView,
    pub itens: Vec<ItemView>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, sqlx::FromRow)]
pub struct PointItem {
    pub point_id: i32,
    pub item_id: i32,
}

/// Validated point ready for insertion. `itens` holds distinct ids in submission order.
#[derive(Clone, Debug, PartialEq)]
pub struct NewPoint {
    pub image: String,
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub uf: String,
    pub itens: Vec<i32>,
}

/// Query string of `GET /points`: `?city=Vitória&uf=ES&itens=1,2`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointsQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uf: Option<String>,
    /// Comma-separated item ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub itens: Option<String>,
}

impl PointsQuery {
    pub fn new(city: impl Into<String>, uf: impl Into<String>, item_ids: &[i32]) -> Self {
        PointsQuery {
            city: Some(city.into()),
            uf: Some(uf.into()),
            itens: Some(join_ids(item_ids)),
        }
    }
}

pub fn join_ids(ids: &[i32]) -> String {
    ids.iter().map(i32::to_string).collect::<Vec<_>>().join(",")
}

/// Parse a comma-separated id list. Entries that are not integers are dropped, so they match nothing.
pub fn parse_item_ids(raw: &str) -> Vec<i32> {
    raw.split(',')
        .filter_map(|part| part.trim().parse::<i32>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1,2,3", vec![1, 2, 3])]
    #[case(" 1 , 2 ", vec![1, 2])]
    #[case("1,abc,3", vec![1, 3])]
    #[case("", vec![])]
    #[case("x,y", vec![])]
    fn parses_item_ids(#[case] raw: &str, #[case] expected: Vec<i32>) {
        assert_eq!(parse_item_ids(raw), expected);
    }

    #[test]
    fn point_view_flattens_point_fields() {
        let view = PointView {
            point: Point {
                id: 7,
                image: "abc-mercado.jpg".into(),
                name: "Mercado".into(),
                email: "contato@mercado.com".into(),
                whatsapp: "27999999999".into(),
                latitude: -20.3155,
                longitude: -40.3128,
                city: "Vitória".into(),
                uf: "ES".into(),
            },
            image_url: "http://localhost:3333/uploads/abc-mercado.jpg".into(),
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["city"], "Vitória");
        assert_eq!(json["image_url"], "http://localhost:3333/uploads/abc-mercado.jpg");
        assert!(json.get("point").is_none());
        let back: PointView = serde_json::from_value(json).unwrap();
        assert_eq!(back, view);
    }

    #[test]
    fn points_query_joins_ids() {
        let q = PointsQuery::new("Vitória", "ES", &[1, 2]);
        assert_eq!(q.itens.as_deref(), Some("1,2"));
    }
}
