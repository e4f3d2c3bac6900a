use yew::prelude::*;
use yew_router::prelude::*;
use web_sys::HtmlInputElement;
use tracing::{error, info};
use crate::{api, session, Route, styles::*};

#[function_component]
pub fn Login() -> Html {
    let username = use_state(String::new);
    let password = use_state(String::new);
    let error_state = use_state(|| None::<String>);
    let submitting = use_state(|| false);
    let navigator = use_navigator();

    let on_username = {
        let username = username.clone();
        Callback::from(move |e: InputEvent| username.set(e.target_unchecked_into::<HtmlInputElement>().value()))
    };
    let on_password = {
        let password = password.clone();
        Callback::from(move |e: InputEvent| password.set(e.target_unchecked_into::<HtmlInputElement>().value()))
    };

    let onsubmit = {
        let username = username.clone();
        let password = password.clone();
        let error_state = error_state.clone();
        let submitting = submitting.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *submitting {
                return;
            }
            submitting.set(true);
            error_state.set(None);

            let (username, password) = ((*username).clone(), (*password).clone());
            let error_state = error_state.clone();
            let submitting = submitting.clone();
            let navigator = navigator.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match api::login(&username, &password).await {
                    Ok(token) => {
                        info!("Logged in");
                        session::store_token(&token);
                        if let Some(navigator) = navigator {
                            navigator.push(&Route::Voting);
                        }
                    }
                    Err(e) => {
                        error!("Login error: {}", e);
                        error_state.set(Some(e));
                    }
                }
                submitting.set(false);
            });
        })
    };

    html! {
        <div class={CARD}>
            <h1 class={HEADING_MD}>{"Login"}</h1>
            <form class="space-y-4" {onsubmit}>
                {if let Some(error) = &*error_state {
                    html! { <p class={TEXT_ERROR}>{error}</p> }
                } else { html! {} }}
                <div>
                    <label for="username" class={TEXT_LABEL}>{"Username"}</label>
                    <input id="username" type="text" required=true class={INPUT_BASE}
                        value={(*username).clone()} oninput={on_username} />
                </div>
                <div>
                    <label for="password" class={TEXT_LABEL}>{"Password"}</label>
                    <input id="password" type="password" required=true class={INPUT_BASE}
                        value={(*password).clone()} oninput={on_password} />
                </div>
                <button type="submit" class={button_primary(true)} disabled={*submitting}>
                    {if *submitting { "Logging in..." } else { "Log in" }}
                </button>
            </form>
        </div>
    }
}
