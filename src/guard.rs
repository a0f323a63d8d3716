use crate::models::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Products,
    Cart,
    Orders,
    Wishlist,
    Contact,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    Denied { redirect_to: Route },
}

/// Authorization decision for a route, taken from the session alone so it
/// can be tested without mounting any UI.
pub fn authorize(route: Route, session: Option<&Session>) -> Access {
    let signed_in = session.is_some();
    let is_admin = session.is_some_and(|s| s.user.is_admin());

    match route {
        // The landing route always forwards somewhere concrete.
        Route::Home => Access::Denied {
            redirect_to: if signed_in {
                Route::Products
            } else {
                Route::Login
            },
        },
        Route::Login if signed_in => Access::Denied {
            redirect_to: if is_admin { Route::Admin } else { Route::Products },
        },
        Route::Register if signed_in => Access::Denied {
            redirect_to: Route::Products,
        },
        Route::Login | Route::Register => Access::Granted,
        Route::Admin => {
            if is_admin {
                Access::Granted
            } else {
                Access::Denied {
                    redirect_to: Route::Login,
                }
            }
        }
        Route::Products | Route::Cart | Route::Orders | Route::Wishlist | Route::Contact => {
            if signed_in {
                Access::Granted
            } else {
                Access::Denied {
                    redirect_to: Route::Login,
                }
            }
        }
    }
}
