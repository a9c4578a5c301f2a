//! App Router

use salvo::Router;

use crate::{identity, orders, products};

pub(crate) fn app_router() -> Router {
    Router::new()
        .hoop(identity::handler)
        .push(
            Router::with_path("orders")
                .get(orders::handlers::index::handler)
                .post(orders::handlers::create::handler)
                .push(
                    Router::with_path("by-number/{number}")
                        .get(orders::handlers::get_by_number::handler),
                )
                .push(
                    Router::with_path("{order}")
                        .get(orders::handlers::get::handler)
                        .push(
                            Router::with_path("status")
                                .patch(orders::handlers::update_status::handler),
                        ),
                ),
        )
        .push(
            Router::with_path("products")
                .post(products::handlers::create::handler)
                .push(
                    Router::with_path("{product}")
                        .get(products::handlers::get::handler)
                        .push(
                            Router::with_path("status")
                                .put(products::handlers::update_status::handler),
                        )
                        .push(
                            Router::with_path("inventory")
                                .put(products::handlers::update_inventory::handler),
                        ),
                ),
        )
}
