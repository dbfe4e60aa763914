use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

///Simulate geometric random-walk price paths.
///
///Log-returns are drawn from N(mu, sigma) per step; the first step of every path is zeroed so
///all paths start exactly at `start_price`. Returns one price vector per path, each of length
///`steps`.
pub fn random_walk_paths(
    steps: usize,
    paths: usize,
    mu: f64,
    sigma: f64,
    start_price: f64,
    seed: u64,
) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    //A negative sigma is a configuration error, not a data error
    let dist = Normal::new(mu, sigma).unwrap();

    (0..paths)
        .map(|_| {
            let mut cumulative = 0.0;
            (0..steps)
                .map(|step| {
                    if step > 0 {
                        cumulative += dist.sample(&mut rng);
                    }
                    start_price * f64::exp(cumulative)
                })
                .collect()
        })
        .collect()
}

///Simulate AR(1) returns `r[t] = rho * r[t-1] + eps[t]` with N(0, sigma) shocks.
///
///`rho = 0` gives serially independent returns, the efficient-market case; positive `rho`
///introduces predictability.
pub fn ar1_returns(steps: usize, rho: f64, sigma: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let dist = Normal::new(0.0, sigma).unwrap();

    let mut returns = Vec::with_capacity(steps);
    let mut last = 0.0;
    for step in 0..steps {
        let shock = dist.sample(&mut rng);
        last = if step == 0 { shock } else { rho * last + shock };
        returns.push(last);
    }
    returns
}

#[cfg(test)]
mod tests {
    use super::{ar1_returns, random_walk_paths};

    #[test]
    fn test_that_paths_start_at_the_initial_price() {
        let paths = random_walk_paths(252, 10, 0.0, 0.02, 100.0, 42);
        assert_eq!(paths.len(), 10);
        for path in &paths {
            assert_eq!(path.len(), 252);
            assert_eq!(path[0], 100.0);
            assert!(path.iter().all(|price| *price > 0.0));
        }
    }

    #[test]
    fn test_that_same_seed_reproduces_paths() {
        let first = random_walk_paths(100, 3, 0.0, 0.02, 100.0, 7);
        let second = random_walk_paths(100, 3, 0.0, 0.02, 100.0, 7);
        assert_eq!(first, second);

        let other_seed = random_walk_paths(100, 3, 0.0, 0.02, 100.0, 8);
        assert_ne!(first, other_seed);
    }

    #[test]
    fn test_that_ar1_with_zero_rho_is_just_shocks() {
        let independent = ar1_returns(500, 0.0, 0.02, 3);
        let persistent = ar1_returns(500, 0.9, 0.02, 3);
        assert_eq!(independent.len(), 500);
        //Shared shocks, so persistence only adds magnitude
        let var = |series: &[f64]| {
            series.iter().map(|ret| ret * ret).sum::<f64>() / series.len() as f64
        };
        assert!(var(&persistent) > var(&independent));
    }
}
