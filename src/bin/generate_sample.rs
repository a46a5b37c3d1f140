//! Writes a deterministic sample catalog to `sample_catalog.csv`.

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform integer in `[0, n)`.
    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

const ADJECTIVES: [&str; 12] = [
    "Silent", "Crimson", "Hidden", "Broken", "Golden", "Midnight", "Lost", "Electric", "Paper",
    "Hollow", "Wild", "Distant",
];

const NOUNS: [&str; 12] = [
    "Harbor", "Kingdom", "Letters", "Summer", "Detective", "Garden", "Motel", "Frontier",
    "Orchestra", "Shadows", "Reunion", "Heist",
];

const COUNTRIES: [&str; 12] = [
    "United States",
    "India",
    "United Kingdom",
    "Japan",
    "South Korea",
    "France",
    "Spain",
    "Mexico",
    "Canada",
    "Germany",
    "Brazil",
    "Nigeria",
];

const MOVIE_GENRES: [&str; 8] = [
    "Dramas",
    "Comedies",
    "Action & Adventure",
    "Documentaries",
    "Horror Movies",
    "International Movies",
    "Thrillers",
    "Children & Family Movies",
];

const TV_GENRES: [&str; 8] = [
    "TV Dramas",
    "TV Comedies",
    "Crime TV Shows",
    "Docuseries",
    "Kids' TV",
    "International TV Shows",
    "Reality TV",
    "Romantic TV Shows",
];

const MOVIE_RATINGS: [&str; 5] = ["G", "PG", "PG-13", "R", "NR"];
const TV_RATINGS: [&str; 5] = ["TV-Y", "TV-G", "TV-PG", "TV-14", "TV-MA"];

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Pick 1..=max distinct entries from `pool`, joined with ", ".
fn pick_tokens(rng: &mut SimpleRng, pool: &[&str], max: usize) -> String {
    let n = 1 + rng.below(max);
    let mut chosen: Vec<&str> = Vec::new();
    while chosen.len() < n {
        let candidate = pool[rng.below(pool.len())];
        if !chosen.contains(&candidate) {
            chosen.push(candidate);
        }
    }
    chosen.join(", ")
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let output_path = "sample_catalog.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");

    writer
        .write_record([
            "title",
            "type",
            "country",
            "date_added",
            "release_year",
            "rating",
            "duration",
            "listed_in",
        ])
        .expect("Failed to write header");

    let rows = 500;
    let mut movies = 0usize;

    for i in 0..rows {
        let is_movie = rng.next_f64() < 0.7;
        if is_movie {
            movies += 1;
        }

        let title = format!(
            "The {} {} {}",
            ADJECTIVES[rng.below(ADJECTIVES.len())],
            NOUNS[rng.below(NOUNS.len())],
            i + 1
        );

        // ~1 in 8 rows leaves the country cell empty.
        let country = if rng.next_f64() < 0.875 {
            pick_tokens(&mut rng, &COUNTRIES, 3)
        } else {
            String::new()
        };

        let date_added = if rng.next_f64() < 0.85 {
            format!(
                "{} {}, {}",
                MONTHS[rng.below(MONTHS.len())],
                1 + rng.below(28),
                2015 + rng.below(7)
            )
        } else {
            String::new()
        };

        // Recent years are over-represented, like a real catalog.
        let release_year = if rng.next_f64() < 0.7 {
            2012 + rng.below(10) as i32
        } else {
            1975 + rng.below(37) as i32
        };

        let rating = if rng.next_f64() < 0.95 {
            if is_movie {
                MOVIE_RATINGS[rng.below(MOVIE_RATINGS.len())]
            } else {
                TV_RATINGS[rng.below(TV_RATINGS.len())]
            }
            .to_string()
        } else {
            String::new()
        };

        let duration = if rng.next_f64() < 0.98 {
            if is_movie {
                let minutes = rng.gauss(100.0, 25.0).clamp(45.0, 210.0) as u32;
                format!("{minutes} min")
            } else {
                let seasons = 1 + rng.below(6).min(rng.below(6));
                if seasons == 1 {
                    "1 Season".to_string()
                } else {
                    format!("{seasons} Seasons")
                }
            }
        } else {
            String::new()
        };

        let listed_in = if is_movie {
            pick_tokens(&mut rng, &MOVIE_GENRES, 3)
        } else {
            pick_tokens(&mut rng, &TV_GENRES, 3)
        };

        let year = release_year.to_string();
        writer
            .write_record([
                title.as_str(),
                if is_movie { "Movie" } else { "TV Show" },
                country.as_str(),
                date_added.as_str(),
                year.as_str(),
                rating.as_str(),
                duration.as_str(),
                listed_in.as_str(),
            ])
            .expect("Failed to write row");
    }

    writer.flush().expect("Failed to flush CSV");

    println!(
        "Wrote {rows} titles ({movies} movies, {} TV shows) to {output_path}",
        rows - movies
    );
}
