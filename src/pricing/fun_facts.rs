use rand::seq::SliceRandom;

/// Length of an articulated truck in km
const TRUCK_LENGTH_KM: f64 = 0.0165;
const MARATHON_KM: f64 = 42.195;
const EARTH_CIRCUMFERENCE_KM: f64 = 40_075.0;

/// What a fun fact may talk about
#[derive(Debug, Clone)]
pub struct FunFactContext<'a> {
    pub origin: &'a str,
    pub destination: &'a str,
    pub distance_km: f64,
}

/// Produces the decorative text attached to an offer
pub trait FunFactGenerator: Send + Sync {
    fn generate(&self, context: &FunFactContext<'_>) -> String;
}

/// Picks one of a handful of distance comparisons at random
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateFunFacts;

impl TemplateFunFacts {
    fn templates(context: &FunFactContext<'_>) -> [String; 3] {
        let km = context.distance_km;
        [
            format!(
                "Did you know? The {:.1} km journey between {} and {} is roughly {:.0} trucks \
                 lined up bumper to bumper!",
                km,
                context.origin,
                context.destination,
                km / TRUCK_LENGTH_KM
            ),
            format!(
                "Did you know? Driving from {} to {} covers about {:.1} marathons.",
                context.origin,
                context.destination,
                km / MARATHON_KM
            ),
            format!(
                "Did you know? At {:.1} km, this trip is {:.2}% of the way around the Earth.",
                km,
                km / EARTH_CIRCUMFERENCE_KM * 100.0
            ),
        ]
    }
}

impl FunFactGenerator for TemplateFunFacts {
    fn generate(&self, context: &FunFactContext<'_>) -> String {
        let templates = Self::templates(context);
        templates
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_default()
    }
}

/// Always returns the same text
#[derive(Debug, Clone)]
pub struct FixedFunFact(pub String);

impl FunFactGenerator for FixedFunFact {
    fn generate(&self, _context: &FunFactContext<'_>) -> String {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> FunFactContext<'static> {
        FunFactContext {
            origin: "Paris",
            destination: "Frankfurt",
            distance_km: 580.0,
        }
    }

    #[test]
    fn test_template_mentions_route() {
        let fact = TemplateFunFacts.generate(&context());
        assert!(fact.starts_with("Did you know?"));
    }

    #[test]
    fn test_templates_render_distance() {
        let templates = TemplateFunFacts::templates(&context());
        assert!(templates[0].contains("580.0 km"));
        assert!(templates[0].contains("35152 trucks"));
        assert!(templates[1].contains("13.7 marathons"));
        assert!(templates[2].contains("1.45%"));
    }

    #[test]
    fn test_fixed_fun_fact() {
        let generator = FixedFunFact("static".to_string());
        assert_eq!(generator.generate(&context()), "static");
    }
}
