use yew::prelude::*;
use yew_router::prelude::*;

mod api;
mod config;
mod login;
mod session;
mod styles;
mod voting;

use crate::{login::Login, voting::Voting};

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")] Voting,
    #[at("/login")] Login,
    #[not_found]
    #[at("/404")] NotFound,
}

const NAV_LINK: &str = "text-base md:text-lg font-medium px-4 py-2 rounded-md transition-colors duration-200 ease-in-out text-gray-200 border border-transparent hover:border-blue-400 hover:text-blue-400";
const NAV_LINK_ACTIVE: &str = "text-blue-400 border-blue-400 ring-2 ring-blue-500 ring-offset-1 ring-offset-gray-900";

#[function_component(Navigation)]
fn navigation() -> Html {
    let current_route = use_route::<Route>();
    let navigator = use_navigator();
    let logged_in = session::is_logged_in();

    let link_classes = |route: Route| classes!(
        NAV_LINK,
        if current_route == Some(route) { NAV_LINK_ACTIVE } else { "" }
    );

    let logout = Callback::from(move |_| {
        session::clear_token();
        if let Some(navigator) = &navigator {
            navigator.push(&Route::Login);
        }
    });

    html! {
        <nav class="bg-gray-900 shadow-lg fixed top-0 w-full z-50">
            <div class="container mx-auto px-6 py-4 flex justify-center space-x-8">
                if logged_in {
                    <Link<Route> to={Route::Voting} classes={link_classes(Route::Voting)}>
                        {"Vote"}
                    </Link<Route>>
                    <button type="button" class={NAV_LINK} onclick={logout}>{"Logout"}</button>
                } else {
                    <Link<Route> to={Route::Login} classes={link_classes(Route::Login)}>
                        {"Login"}
                    </Link<Route>>
                }
            </div>
        </nav>
    }
}

#[function_component(App)]
fn app() -> Html {
    html! {
        <BrowserRouter>
            <div class="min-h-screen bg-gray-900">
                <Navigation />
                <div class="pt-16">
                    <Switch<Route> render={switch} />
                </div>
            </div>
        </BrowserRouter>
    }
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Voting if session::is_logged_in() => html! { <Voting /> },
        Route::Voting => html! { <Redirect<Route> to={Route::Login} /> },
        Route::Login => html! { <Login /> },
        Route::NotFound => html! { <Redirect<Route> to={Route::Voting} /> },
    }
}

fn main() {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();
    }
    yew::Renderer::<App>::new().render();
}
