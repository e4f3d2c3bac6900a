use std::cell::RefCell;
use std::rc::Rc;
use yew::prelude::*;
use yew_router::prelude::*;
use gloo_timers::callback::Timeout;
use time::OffsetDateTime;
use shared::{
    format_percentage, ApiError, DateKey, DateView, MonthLabel, OptimisticVoteStore,
    SyncConfig, ToggleOutcome, ToggleRejected, VoteSyncController,
};
use tracing::debug;
use crate::api::HttpVoteApi;
use crate::config::CONFIG;
use crate::session::BrowserSession;
use crate::styles::*;
use crate::Route;

type Controller = VoteSyncController<HttpVoteApi, BrowserSession>;

pub enum Msg {
    Loaded(Result<(), ApiError>),
    Toggle(DateKey, MonthLabel),
    Settled(DateKey, ToggleOutcome),
    Refresh(MonthLabel),
    Refreshed(Result<(), ApiError>),
    DismissNotice,
}

#[derive(PartialEq)]
enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

pub struct Voting {
    controller: Rc<Controller>,
    load: LoadState,
    notice: Option<String>,
    _notice_timeout: Option<Timeout>,
}

impl Component for Voting {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let navigator = ctx.link().navigator();
        let session = BrowserSession::new(Callback::from(move |_| {
            if let Some(navigator) = &navigator {
                navigator.push(&Route::Login);
            }
        }));
        let config = SyncConfig::for_year(OffsetDateTime::now_utc().year());
        let store = Rc::new(RefCell::new(OptimisticVoteStore::new()));
        let controller = Rc::new(VoteSyncController::new(HttpVoteApi::default(), session, store, config));

        let loader = controller.clone();
        ctx.link().send_future(async move { Msg::Loaded(loader.load().await) });

        Self {
            controller,
            load: LoadState::Loading,
            notice: None,
            _notice_timeout: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            // Partial failures still leave whatever loaded on screen.
            Msg::Loaded(result) => {
                self.load = match result {
                    Ok(()) => LoadState::Ready,
                    Err(e @ ApiError::Unauthorized) => LoadState::Failed(e.to_string()),
                    Err(e) => {
                        self.show_notice(ctx, format!("Some votes could not be loaded: {}", e));
                        LoadState::Ready
                    }
                };
                true
            }
            Msg::Toggle(key, month) => match self.controller.begin(key.clone(), month) {
                Ok(pending) => {
                    let controller = self.controller.clone();
                    ctx.link().send_future(async move {
                        Msg::Settled(key, controller.settle(pending).await)
                    });
                    true
                }
                Err(ToggleRejected::InFlight(_)) => false,
                Err(ToggleRejected::NotAuthenticated) => false,
            },
            Msg::Settled(key, outcome) => {
                match outcome {
                    ToggleOutcome::RolledBack(e) if !e.is_auth_expired() => {
                        self.show_notice(ctx, format!("Your vote for {} could not be saved.", key));
                    }
                    outcome => debug!(%key, ?outcome, "vote settled"),
                }
                true
            }
            Msg::Refresh(month) => {
                let controller = self.controller.clone();
                ctx.link().send_future(async move { Msg::Refreshed(controller.refresh(month).await) });
                false
            }
            Msg::Refreshed(result) => {
                if let Err(e) = result {
                    if !e.is_auth_expired() {
                        self.show_notice(ctx, "Could not refresh the vote counts.".to_string());
                    }
                }
                true
            }
            Msg::DismissNotice => {
                self.notice = None;
                self._notice_timeout = None;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let body = match &self.load {
            LoadState::Loading => html! {
                <div class="flex justify-center p-8">
                    <div class={combine_classes("animate-pulse", TEXT_MUTED)}>{"Loading votes..."}</div>
                </div>
            },
            LoadState::Failed(error) => html! {
                <div class={alert_style("error")}>
                    <p>{error}</p>
                    <Link<Route> to={Route::Login} classes={classes!(button_primary(false), "mt-4")}>
                        {"Log in again"}
                    </Link<Route>>
                </div>
            },
            LoadState::Ready => html! {
                <div class="grid gap-4 md:grid-cols-2">
                    {for self.controller.config().cycle.months.iter().map(|&month| self.render_month(ctx, month))}
                </div>
            },
        };

        html! {
            <div class={CONTAINER}>
                <h1 class={combine_classes(HEADING_LG, "text-white")}>{"Vote for the Gathering Date"}</h1>
                {if let Some(notice) = &self.notice {
                    html! { <div class={alert_style("warning")}>{notice}</div> }
                } else { html! {} }}
                {body}
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.controller.reset();
    }
}

impl Voting {
    fn show_notice(&mut self, ctx: &Context<Self>, notice: String) {
        let link = ctx.link().clone();
        self.notice = Some(notice);
        self._notice_timeout = Some(Timeout::new(CONFIG.notice_timeout_ms, move || {
            link.send_message(Msg::DismissNotice);
        }));
    }

    fn render_month(&self, ctx: &Context<Self>, month: MonthLabel) -> Html {
        let rows = self.controller.month_view(month);
        let total: u32 = rows.iter().map(|row| row.count).sum();

        html! {
            <div class={CARD_SECTION}>
                <div class={FLEX_BETWEEN}>
                    <h2 class={HEADING_SM}>{month.name()}</h2>
                    <button type="button" class={TEXT_MUTED}
                        onclick={ctx.link().callback(move |_| Msg::Refresh(month))}>
                        {format!("{} votes · refresh", total)}
                    </button>
                </div>
                <ul class={SPACE_Y_BASE}>
                    {for rows.iter().map(|row| render_row(ctx, month, total, row))}
                </ul>
            </div>
        }
    }
}

fn render_row(ctx: &Context<Voting>, month: MonthLabel, month_total: u32, row: &DateView) -> Html {
    let key = row.key.clone();
    let onclick = ctx.link().callback(move |_| Msg::Toggle(key.clone(), month));
    let (label, button_class) = if row.is_voted_by_me {
        ("-", combine_classes(BUTTON_BASE, BUTTON_DANGER))
    } else {
        ("+", combine_classes(BUTTON_BASE, BUTTON_SUCCESS))
    };

    html! {
        <li class={FLEX_BETWEEN}>
            <div class="flex flex-col">
                <span class="text-gray-100 font-medium">{row.key.as_str()}</span>
                <span class={TEXT_MUTED}>
                    {format!("{} votes ({}%)", row.count, format_percentage(row.percentage, month_total))}
                </span>
            </div>
            <button type="button" class={button_class} disabled={row.pending} {onclick}>
                {label}
            </button>
        </li>
    }
}
