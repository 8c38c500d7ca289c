use std::sync::OnceLock;
use tera::Tera;

static TERA: OnceLock<Tera> = OnceLock::new();

pub fn get_tera() -> &'static Tera {
    TERA.get_or_init(|| match Tera::new("templates/**/*.html") {
        Ok(tera) => tera,
        Err(e) => {
            tracing::error!("template parse failure: {e}");
            Tera::default()
        }
    })
}
