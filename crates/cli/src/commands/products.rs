//! Catalog report commands.

use catalogo_admin::backend::AdminProductQuery;

use super::{CliError, Connection, emit};

/// Print how many products, categories, tags and providers exist.
pub async fn summary(conn: &Connection) -> Result<(), CliError> {
    let api = &conn.api;
    let token = &conn.token;
    let query = AdminProductQuery {
        page: 1,
        ..AdminProductQuery::default()
    };

    let (products, categories, tags, providers) = tokio::join!(
        api.products(token, &query),
        api.categories(token),
        api.tags(token),
        api.providers(token),
    );

    emit(&format!("Productos:    {}", products?.total));
    emit(&format!("Categorías:   {}", categories?.len()));
    emit(&format!("Etiquetas:    {}", tags?.len()));
    emit(&format!("Proveedores:  {}", providers?.len()));
    Ok(())
}
