use crate::utils::*;
use clap::Args;
use clearfield_core as game;
use game::Difficulty;
use gloo::timers::callback::Interval;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

const TICK_MILLIS: u32 = 1_000;

#[derive(Copy, Clone, Debug, PartialEq)]
enum ViewCellState {
    Hidden,
    Flagged,
    Revealed(u8),
    Mine,
}

impl ViewCellState {
    fn from_cell(cell: game::CellView) -> Self {
        match cell {
            game::CellView {
                is_revealed: true,
                is_mine: true,
                ..
            } => Self::Mine,
            game::CellView {
                is_revealed: true,
                adjacent_count,
                ..
            } => Self::Revealed(adjacent_count),
            game::CellView {
                is_flagged: true, ..
            } => Self::Flagged,
            _ => Self::Hidden,
        }
    }

    fn classes(self) -> Classes {
        use ViewCellState::*;
        classes!(
            "cell",
            match self {
                Hidden => classes!(),
                Flagged => classes!("flagged"),
                Revealed(_) => classes!("revealed"),
                Mine => classes!("revealed", "mine"),
            }
        )
    }

    fn label(self) -> String {
        use ViewCellState::*;
        match self {
            Hidden | Revealed(0) => String::new(),
            Flagged => "🚩".to_string(),
            Mine => "💣".to_string(),
            Revealed(count) => count.to_string(),
        }
    }

    fn number(self) -> Option<String> {
        match self {
            Self::Revealed(count) if count > 0 => Some(count.to_string()),
            _ => None,
        }
    }
}

fn status_face(status: game::GameStatus) -> &'static str {
    match (status.game_over, status.did_win) {
        (false, _) => "😃",
        (true, true) => "🎉",
        (true, false) => "😵",
    }
}

fn difficulty_label(difficulty: Difficulty) -> String {
    let config = difficulty.config();
    let name = match difficulty {
        Difficulty::Easy => "Easy",
        Difficulty::Medium => "Medium",
        Difficulty::Hard => "Hard",
    };
    format!(
        "{} ({}×{}, {} mines)",
        name,
        config.cols(),
        config.rows(),
        config.mines
    )
}

/// What to do with the tick source after a message was handled.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum TickSourceAction {
    Start,
    Keep,
    Cancel,
}

fn tick_source_action(ticking: bool, has_source: bool) -> TickSourceAction {
    match (ticking, has_source) {
        (true, false) => TickSourceAction::Start,
        (false, true) => TickSourceAction::Cancel,
        (true, true) | (false, false) => TickSourceAction::Keep,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Reveal(game::Coord2),
    ToggleFlag(game::Coord2),
    Tick,
    NewGame,
    ChangeDifficulty(Difficulty),
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    row: game::Coord,
    col: game::Coord,
    cell_state: ViewCellState,
    #[prop_or_default]
    locked: bool,
    on_reveal: Callback<game::Coord2>,
    on_flag: Callback<game::Coord2>,
}

#[function_component(CellTile)]
fn cell_component(props: &CellProps) -> Html {
    let CellProps {
        row,
        col,
        cell_state,
        locked,
        on_reveal,
        on_flag,
    } = props.clone();

    let mut class = cell_state.classes();
    if locked {
        class.push("locked");
    }

    let onclick = Callback::from(move |_: MouseEvent| {
        log::trace!("({}, {}) click", row, col);
        on_reveal.emit((row, col));
    });

    let oncontextmenu = Callback::from(move |e: MouseEvent| {
        e.prevent_default();
        log::trace!("({}, {}) context menu", row, col);
        on_flag.emit((row, col));
    });

    html! {
        <td {class} {onclick} {oncontextmenu} data-number={cell_state.number()}>
            {cell_state.label()}
        </td>
    }
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Difficulty preset to start with
    #[arg(short, long)]
    pub difficulty: Option<Difficulty>,

    /// Force a seed instead of random
    #[arg(short, long)]
    pub seed: Option<u64>,
}

#[derive(Debug)]
pub(crate) struct GameView {
    session: game::GameSession,
    difficulty: Difficulty,
    fixed_seed: Option<u64>,
    tick_interval: Option<Interval>,
}

impl GameView {
    fn next_seed(&self) -> u64 {
        self.fixed_seed.unwrap_or_else(js_random_seed)
    }

    fn start_new_game(&mut self, difficulty: Difficulty) {
        let seed = self.next_seed();
        self.difficulty = difficulty;
        // dropping the interval cancels it before the old session goes away
        self.tick_interval = None;
        self.session.new_game(difficulty, seed);
    }

    /// Keeps one tick source alive exactly while the session is ticking.
    fn sync_tick_source(&mut self, ctx: &Context<Self>) {
        match tick_source_action(self.session.is_ticking(), self.tick_interval.is_some()) {
            TickSourceAction::Start => {
                let link = ctx.link().clone();
                self.tick_interval = Some(Interval::new(TICK_MILLIS, move || {
                    link.send_message(Msg::Tick)
                }));
                log::debug!("tick source started");
            }
            TickSourceAction::Cancel => {
                self.tick_interval = None;
                log::debug!("tick source cancelled");
            }
            TickSourceAction::Keep => {}
        }
    }

    fn view_game_over(&self, ctx: &Context<Self>, status: game::GameStatus) -> Html {
        if !status.game_over {
            return html! {};
        }

        let (title, message) = if status.did_win {
            (
                "🎉 You won!".to_string(),
                format!("You won in {} seconds!", status.elapsed_seconds),
            )
        } else {
            (
                "💥 Game over!".to_string(),
                "You hit a mine, try again!".to_string(),
            )
        };
        let cb_play_again = ctx.link().callback(|_: MouseEvent| Msg::NewGame);

        html! {
            <dialog id="game-over" open={true}>
                <h2>{title}</h2>
                <p>{message}</p>
                <button onclick={cb_play_again}>{"Play again"}</button>
            </dialog>
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let difficulty = props.difficulty.unwrap_or_default();
        let seed = props.seed.unwrap_or_else(js_random_seed);

        Self {
            session: game::GameSession::new(difficulty, seed),
            difficulty,
            fixed_seed: props.seed,
            tick_interval: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        let updated = match msg {
            Reveal(coords) => {
                log::debug!("reveal cell: {:?}", coords);
                match self.session.reveal(coords) {
                    Ok(outcome) => outcome.has_update(),
                    Err(err) => {
                        log::warn!("reveal at {:?} failed: {}", coords, err);
                        false
                    }
                }
            }
            ToggleFlag(coords) => {
                log::debug!("toggle flag: {:?}", coords);
                match self.session.toggle_flag(coords) {
                    Ok(outcome) => outcome.has_update(),
                    Err(err) => {
                        log::warn!("flag at {:?} failed: {}", coords, err);
                        false
                    }
                }
            }
            Tick => self.session.tick(),
            NewGame => {
                self.start_new_game(self.difficulty);
                true
            }
            ChangeDifficulty(difficulty) => {
                log::debug!("difficulty changed: {}", difficulty);
                self.start_new_game(difficulty);
                true
            }
        };

        self.sync_tick_source(ctx);
        updated
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let board = self.session.board();
        let (rows, cols) = board.size();
        let status = self.session.status();
        let mines_left = format_for_counter(status.remaining_mine_count as i32);
        let elapsed_time = format_for_counter(status.elapsed_seconds.min(999) as i32);

        let cb_new_game = ctx.link().callback(|_: MouseEvent| Msg::NewGame);
        let cb_change_difficulty = ctx.link().batch_callback(|e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            select.value().parse().ok().map(Msg::ChangeDifficulty)
        });
        let on_reveal = ctx.link().callback(Msg::Reveal);
        let on_flag = ctx.link().callback(Msg::ToggleFlag);

        html! {
            <div class="clearfield" oncontextmenu={Callback::from(move |e: MouseEvent| e.prevent_default())}>
                <header>
                    <select id="difficulty" onchange={cb_change_difficulty}>
                        {
                            for Difficulty::ALL.into_iter().map(|difficulty| html! {
                                <option value={difficulty.name()} selected={difficulty == self.difficulty}>
                                    {difficulty_label(difficulty)}
                                </option>
                            })
                        }
                    </select>
                    <button id="new-game" onclick={cb_new_game.clone()}>{"New game"}</button>
                </header>
                <nav>
                    <aside id="mines-count">{mines_left}</aside>
                    <span><button id="restart" onclick={cb_new_game}>{status_face(status)}</button></span>
                    <aside id="timer">{elapsed_time}</aside>
                </nav>
                <table id="game-board" class={(!status.game_over).then_some("playable")}>
                    {
                        for (0..rows).map(|row| html! {
                            <tr>
                                {
                                    for (0..cols).map(|col| {
                                        let cell_state = ViewCellState::from_cell(board.cell_view((row, col)));
                                        let locked = status.game_over
                                            || matches!(cell_state, ViewCellState::Revealed(_) | ViewCellState::Mine);
                                        html! {
                                            <CellTile
                                                {row}
                                                {col}
                                                {cell_state}
                                                {locked}
                                                on_reveal={on_reveal.clone()}
                                                on_flag={on_flag.clone()}
                                            />
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                {self.view_game_over(ctx, status)}
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.tick_interval = None;
        self.session.dispose();
    }
}
