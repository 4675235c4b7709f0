use clap::{Args, Parser, Subcommand};
use cycle_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cyclecast")]
#[command(about = "Cycle and pregnancy date projections", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Project as of this date instead of today (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<CalendarDate>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the saved profiles projected onto today (default)
    Status,

    /// Current cycle day, phase and fertile window
    Cycle {
        #[command(flatten)]
        profile: CycleArgs,
    },

    /// Gestational age, trimester and due date
    Pregnancy {
        #[command(flatten)]
        setup: PregnancyArgs,
    },

    /// Upcoming predicted periods
    Forecast {
        #[command(flatten)]
        profile: CycleArgs,

        /// Number of periods to list
        #[arg(long)]
        count: Option<usize>,
    },

    /// Day-by-day phase calendar starting today
    Calendar {
        #[command(flatten)]
        profile: CycleArgs,

        /// Number of days to list
        #[arg(long)]
        days: Option<u32>,
    },

    /// Manage saved profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

/// Cycle profile given on the command line; falls back to the saved one
#[derive(Args, Clone, Copy)]
struct CycleArgs {
    /// First day of the most recent period (YYYY-MM-DD)
    #[arg(long)]
    last_period: Option<CalendarDate>,

    /// Average cycle length in days
    #[arg(long)]
    cycle_length: Option<u32>,

    /// Period duration in days
    #[arg(long)]
    period_duration: Option<u32>,
}

/// Pregnancy anchor given on the command line; falls back to the saved one
#[derive(Args, Clone, Copy)]
struct PregnancyArgs {
    /// Expected due date (YYYY-MM-DD)
    #[arg(long, conflicts_with = "lmp")]
    due_date: Option<CalendarDate>,

    /// First day of the last menstrual period (YYYY-MM-DD)
    #[arg(long)]
    lmp: Option<CalendarDate>,
}

impl PregnancyArgs {
    fn setup(self) -> Option<PregnancySetup> {
        match (self.due_date, self.lmp) {
            (Some(due), _) => Some(PregnancySetup::from_due_date(due)),
            (None, Some(lmp)) => Some(PregnancySetup::from_lmp(lmp)),
            (None, None) => None,
        }
    }
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Print the saved profiles
    Show,

    /// Save a cycle profile
    SetCycle {
        /// First day of the most recent period (YYYY-MM-DD)
        #[arg(long)]
        last_period: CalendarDate,

        /// Average cycle length in days
        #[arg(long)]
        cycle_length: Option<u32>,

        /// Period duration in days
        #[arg(long)]
        period_duration: Option<u32>,
    },

    /// Save a pregnancy setup from either a due date or an LMP date
    #[command(group(clap::ArgGroup::new("anchor").required(true).args(["due_date", "lmp"])))]
    SetPregnancy {
        #[command(flatten)]
        setup: PregnancyArgs,
    },

    /// Remove saved profiles (both unless one is named)
    Clear {
        #[arg(long)]
        cycle: bool,

        #[arg(long)]
        pregnancy: bool,
    },
}

fn main() -> Result<()> {
    cycle_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let store_path = data_dir.join(PROFILE_FILE);

    let today = match cli.today {
        Some(day) => FixedClock(day).today(),
        None => SystemClock.today(),
    };
    tracing::debug!("Projecting as of {}", today);

    let out = Output { json: cli.json };

    match cli.command.unwrap_or(Commands::Status) {
        Commands::Status => cmd_status(&store_path, today, &out),
        Commands::Cycle { profile } => {
            let profile = resolve_cycle(profile, &store_path, &config)?;
            out.cycle(&project_cycle(&profile, today)?)
        }
        Commands::Pregnancy { setup } => {
            let setup = resolve_pregnancy(setup, &store_path)?;
            out.pregnancy(&project_gestation(&setup, today)?, &pregnancy_milestones(&setup)?)
        }
        Commands::Forecast { profile, count } => {
            let profile = resolve_cycle(profile, &store_path, &config)?;
            let count = count.unwrap_or(config.display.forecast_count);
            out.forecast(&upcoming_periods(&profile, today, count)?)
        }
        Commands::Calendar { profile, days } => {
            let profile = resolve_cycle(profile, &store_path, &config)?;
            let days = days.unwrap_or(config.display.calendar_days);
            out.calendar(&phase_calendar(&profile, today, days)?)
        }
        Commands::Profile { action } => cmd_profile(action, &store_path, &config, &out),
    }
}

fn resolve_cycle(args: CycleArgs, store_path: &Path, config: &Config) -> Result<CycleProfile> {
    if let Some(start) = args.last_period {
        return config
            .defaults
            .profile(start, args.cycle_length, args.period_duration);
    }

    match ProfileStore::load(store_path)?.cycle {
        Some(saved) => CycleProfile::new(
            saved.last_period_start,
            args.cycle_length.unwrap_or(saved.cycle_length_days),
            args.period_duration.unwrap_or(saved.period_duration_days),
        ),
        None => Err(Error::InvalidProfile(
            "no cycle profile saved; pass --last-period or run `cyclecast profile set-cycle`"
                .into(),
        )),
    }
}

fn resolve_pregnancy(args: PregnancyArgs, store_path: &Path) -> Result<PregnancySetup> {
    if let Some(setup) = args.setup() {
        return Ok(setup);
    }

    ProfileStore::load(store_path)?.pregnancy.ok_or_else(|| {
        Error::InvalidProfile(
            "no pregnancy saved; pass --due-date/--lmp or run `cyclecast profile set-pregnancy`"
                .into(),
        )
    })
}

fn cmd_status(store_path: &Path, today: CalendarDate, out: &Output) -> Result<()> {
    let store = ProfileStore::load(store_path)?;

    let (cycle, cycle_error) = section(
        store
            .cycle
            .as_ref()
            .map(|profile| project_cycle(profile, today)),
    )?;
    let (pregnancy, pregnancy_error) = section(
        store
            .pregnancy
            .as_ref()
            .map(|setup| project_gestation(setup, today)),
    )?;

    if out.json {
        let value = serde_json::json!({
            "today": today,
            "cycle": cycle,
            "cycle_error": cycle_error,
            "pregnancy": pregnancy,
            "pregnancy_error": pregnancy_error,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if store.cycle.is_none() && store.pregnancy.is_none() {
        println!("No profiles saved yet.");
        println!("  cyclecast profile set-cycle --last-period YYYY-MM-DD");
        println!("  cyclecast profile set-pregnancy --due-date YYYY-MM-DD");
        return Ok(());
    }

    if let Some(state) = cycle {
        out.cycle(&state)?;
    }
    if let Some(error) = cycle_error {
        println!("Cycle: {}", error);
    }
    if let Some(age) = pregnancy {
        out.pregnancy(&age, &[])?;
    }
    if let Some(error) = pregnancy_error {
        println!("Pregnancy: {}", error);
    }
    Ok(())
}

/// Split one saved profile's projection into its value or a printable input
/// error, so a stale profile does not hide the other one. Anything other than
/// an input error still aborts.
fn section<T>(projection: Option<Result<T>>) -> Result<(Option<T>, Option<String>)> {
    match projection {
        None => Ok((None, None)),
        Some(Ok(value)) => Ok((Some(value), None)),
        Some(Err(e)) if e.is_input_error() => {
            tracing::warn!("Saved profile could not be projected: {}", e);
            Ok((None, Some(e.to_string())))
        }
        Some(Err(e)) => Err(e),
    }
}

fn cmd_profile(
    action: ProfileAction,
    store_path: &Path,
    config: &Config,
    out: &Output,
) -> Result<()> {
    match action {
        ProfileAction::Show => {
            let store = ProfileStore::load(store_path)?;
            out.profiles(&store)
        }
        ProfileAction::SetCycle {
            last_period,
            cycle_length,
            period_duration,
        } => {
            let profile = config
                .defaults
                .profile(last_period, cycle_length, period_duration)?;
            let store = ProfileStore::update(store_path, |store| {
                store.cycle = Some(profile);
                Ok(())
            })?;
            tracing::info!("Saved cycle profile to {:?}", store_path);
            println!("✓ Cycle profile saved");
            out.profiles(&store)
        }
        ProfileAction::SetPregnancy { setup } => {
            let setup = setup.setup().ok_or_else(|| {
                Error::InvalidProfile("either --due-date or --lmp is required".into())
            })?;
            // Reject anchors whose derived dates fall off the calendar
            setup.due_date()?;
            let store = ProfileStore::update(store_path, |store| {
                store.pregnancy = Some(setup);
                Ok(())
            })?;
            tracing::info!("Saved pregnancy setup to {:?}", store_path);
            println!("✓ Pregnancy saved");
            out.profiles(&store)
        }
        ProfileAction::Clear { cycle, pregnancy } => {
            let both = !cycle && !pregnancy;
            if !store_path.exists() {
                println!("Nothing to clear.");
                return Ok(());
            }
            ProfileStore::update(store_path, |store| {
                if cycle || both {
                    store.cycle = None;
                }
                if pregnancy || both {
                    store.pregnancy = None;
                }
                Ok(())
            })?;
            println!("✓ Profiles cleared");
            Ok(())
        }
    }
}

/// Formats engine output as text or JSON
struct Output {
    json: bool,
}

impl Output {
    fn emit<T: serde::Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    fn cycle(&self, state: &CycleState) -> Result<()> {
        if self.json {
            return self.emit(state);
        }

        println!("\n╭─────────────────────────────────────────╮");
        println!("│  CYCLE DAY {} of {}", state.cycle_day, state.cycle_length_days);
        println!("╰─────────────────────────────────────────╯");
        println!();
        println!("  Phase: {}", state.phase);
        println!(
            "  Fertile window: days {}-{}",
            state.fertile_window.start_day, state.fertile_window.end_day
        );
        println!(
            "  Ovulation (est.): day {} ({})",
            state.ovulation_day,
            in_days(state.days_until_ovulation)
        );
        if state.days_until_next_period == 0 {
            println!("  Period: ongoing");
        } else {
            println!(
                "  Next period: {} ({})",
                state.next_period_start,
                in_days(state.days_until_next_period)
            );
        }
        println!();
        Ok(())
    }

    fn pregnancy(&self, age: &GestationalAge, milestones: &[Milestone]) -> Result<()> {
        if self.json {
            return self.emit(&serde_json::json!({
                "age": age,
                "milestones": milestones,
            }));
        }

        println!("\n╭─────────────────────────────────────────╮");
        println!("│  {} WEEKS {} DAYS", age.weeks, age.days);
        println!("╰─────────────────────────────────────────╯");
        println!();
        println!("  Trimester: {}", age.trimester);
        println!("  LMP: {}", age.lmp_date);
        if age.days_until_due >= 0 {
            println!("  Due date: {} (in {} days)", age.due_date, age.days_until_due);
        } else {
            println!("  Due date: {} ({} days ago)", age.due_date, -age.days_until_due);
        }

        if !milestones.is_empty() {
            println!();
            for milestone in milestones {
                let label = match milestone.kind {
                    MilestoneKind::SecondTrimester => "Second trimester",
                    MilestoneKind::ThirdTrimester => "Third trimester",
                    MilestoneKind::DueDate => "Due date",
                };
                println!("  → {:<17} {} (week {})", label, milestone.date, milestone.week);
            }
        }
        println!();
        Ok(())
    }

    fn forecast(&self, forecasts: &[PeriodForecast]) -> Result<()> {
        if self.json {
            return self.emit(&forecasts);
        }

        if forecasts.is_empty() {
            println!("No periods requested.");
            return Ok(());
        }

        println!("Upcoming periods:");
        for forecast in forecasts {
            if forecast.duration_days == 0 {
                println!("  → {}", forecast.start);
            } else {
                println!(
                    "  → {} to {} ({} days)",
                    forecast.start, forecast.end, forecast.duration_days
                );
            }
        }
        Ok(())
    }

    fn calendar(&self, days: &[CalendarDay]) -> Result<()> {
        if self.json {
            return self.emit(&days);
        }

        for day in days {
            println!("  {}  day {:>2}  {}", day.date, day.cycle_day, day.phase);
        }
        Ok(())
    }

    fn profiles(&self, store: &ProfileStore) -> Result<()> {
        if self.json {
            return self.emit(store);
        }

        match &store.cycle {
            Some(profile) => println!(
                "Cycle: last period {}, {}-day cycle, {}-day period",
                profile.last_period_start, profile.cycle_length_days, profile.period_duration_days
            ),
            None => println!("Cycle: not set"),
        }
        match &store.pregnancy {
            Some(setup) => {
                let mode = match setup.mode {
                    PregnancyMode::DueDate => "due date",
                    PregnancyMode::Lmp => "LMP",
                };
                println!("Pregnancy: {} {}", mode, setup.reference_date);
            }
            None => println!("Pregnancy: not set"),
        }
        Ok(())
    }
}

fn in_days(days: u32) -> String {
    match days {
        0 => "today".into(),
        1 => "tomorrow".into(),
        n => format!("in {} days", n),
    }
}
