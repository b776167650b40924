use clap::{App, Arg, ArgMatches};
use nufft::benchmark::{
    fft_memory, records_to_json, BenchmarkConfig, FftMeasurement, FootprintRecord,
};
use nufft::plot::{NullPlotter, Plotter, PythonPlotter};
use nufft::trace::{set_tracing, take_operator_traces};
use nufft::{DeepSize, Error, FftEngine};

fn parse<T: core::str::FromStr>(matches: &ArgMatches, name: &'static str) -> Result<T, Error> {
    let value = matches.value_of(name).unwrap_or_default();
    value.parse().map_err(|_| Error::InvalidArgument {
        arg: name,
        reason: format!("cannot parse `{}`", value),
    })
}

fn print_table(records: &[FootprintRecord]) {
    println!(
        "{:>8} {:>14} {:>14} {:>14}",
        "n", "DFT (bytes)", "FFT (bytes)", "FFTop (bytes)"
    );
    for record in records {
        println!(
            "{:>8} {:>14} {:>14} {:>14}",
            record.n, record.dft_bytes, record.fft_bytes, record.operator_bytes
        );
    }
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let engine = matches
        .value_of("engine")
        .unwrap_or("rustfft")
        .parse::<FftEngine>()?;
    let measurement = matches
        .value_of("fft-measure")
        .unwrap_or("size")
        .parse::<FftMeasurement>()?;
    let config = BenchmarkConfig::default()
        .with_exponents(
            parse(matches, "start")?,
            parse(matches, "stop")?,
            parse(matches, "step")?,
        )
        .with_engine(engine)
        .with_fft_measurement(measurement);

    let trace = matches.is_present("trace");
    set_tracing(trace);

    eprintln!(
        "measuring sizes {:?} with the {} engine",
        config.sizes()?,
        engine.name()
    );
    let plotter: Box<dyn Plotter> = if matches.is_present("no-plot") {
        Box::new(NullPlotter)
    } else {
        let plotter = PythonPlotter::new(matches.value_of("output").unwrap_or_default());
        eprintln!("rendering to {}", plotter.output().display());
        Box::new(plotter)
    };
    let records = fft_memory(&config, &DeepSize, plotter.as_ref())?;

    if matches.is_present("json") {
        println!("{}", records_to_json(&records)?);
    } else {
        print_table(&records);
    }

    if trace {
        for record in take_operator_traces() {
            eprintln!("{}", record.to_json_line());
        }
    }
    Ok(())
}

fn main() {
    let matches = App::new("nufft-prof")
        .about("Compares the memory held by dense, planned, and operator DFTs")
        .arg(
            Arg::with_name("start")
                .long("start")
                .takes_value(true)
                .default_value("2"),
        )
        .arg(
            Arg::with_name("stop")
                .long("stop")
                .takes_value(true)
                .default_value("4"),
        )
        .arg(
            Arg::with_name("step")
                .long("step")
                .takes_value(true)
                .default_value("0.5"),
        )
        .arg(
            Arg::with_name("engine")
                .long("engine")
                .takes_value(true)
                .possible_values(&["naive", "rustfft"])
                .default_value("rustfft"),
        )
        .arg(
            Arg::with_name("fft-measure")
                .long("fft-measure")
                .takes_value(true)
                .possible_values(&["plan", "size"])
                .default_value("size"),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .short("o")
                .takes_value(true)
                .default_value("target/plots/memory_comparison.png"),
        )
        .arg(Arg::with_name("no-plot").long("no-plot"))
        .arg(Arg::with_name("json").long("json"))
        .arg(
            Arg::with_name("trace")
                .long("trace")
                .help("Prints operator traces to stderr as JSON lines"),
        )
        .get_matches();

    if let Err(err) = run(&matches) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}
