#[derive(Debug)]
pub struct Truck {
    pub id: i64,
    pub name: String,
    pub image_url: Option<String>,
}
