//! Built-in catalogs

use super::{CatalogError, ResponseCatalog};
use std::fmt;
use std::str::FromStr;

const ADMISSION_PROCESS: &str = "The admission process at MUJ CSE involves: 1. JEE Mains score consideration 2. Online application 3. Merit list declaration 4. Counseling rounds. Would you like more specific details about any of these steps?";
const FEE_STRUCTURE: &str = "The annual fee structure for B.Tech CSE program is approximately ₹3.25 lakhs per year. This includes tuition fees, development fees, and other charges. Would you like a detailed breakdown?";
const COURSE_DURATION: &str = "The B.Tech CSE program at MUJ is a 4-year undergraduate course spread across 8 semesters. Each semester includes core subjects, electives, and practical labs.";
const PLACEMENT_STATISTICS: &str = "For the 2023 batch, CSE department achieved: 1. 95% placement rate 2. Average package of 8.5 LPA 3. Highest package of 45 LPA 4. Top recruiters include Microsoft, Amazon, and Google.";
const FACULTY_INFORMATION: &str = "The CSE department has over 100 faculty members, including: 1. 40+ PhD holders 2. Industry experts 3. Research scholars. Would you like to know about specific faculty members or areas of expertise?";
const INFRASTRUCTURE: &str = "MUJ CSE department features: 1. Modern computer labs 2. Research centers 3. Innovation hub 4. 24/7 internet facility 5. Specialized labs for AI, IoT, and Cybersecurity.";

const PROGRAMS_OFFERED: &str = "The CSE department at MUJ offers the following programs:\n1. B. Tech (Computer Science & Engineering)\n2. B. Tech (CSE with specialization in AI & ML)\n3. B. Tech (CSE with specialization in Data Science)\n4. M. Tech (Computer Science & Engineering)\n5. Ph.D. in Computer Science & Engineering";
const ELIGIBILITY: &str = "To be eligible for B. Tech CSE you need:\n1. 10+2 with Physics and Mathematics as compulsory subjects\n2. At least 50% aggregate in the qualifying subjects\n3. A valid JEE Mains score";
const SCHOLARSHIPS: &str = "MUJ offers merit scholarships based on JEE Mains rank and 12th board results, plus sports and need-based scholarships. Renewal each year depends on academic performance.";
const HOSTELS: &str = "MUJ offers separate hostels for boys and girls with AC/Non-AC rooms, 24/7 security, mess facility, Wi-Fi connectivity, laundry service and an on-campus medical facility.";
const SYLLABUS: &str = "The B. Tech CSE syllabus covers:\n1. Programming and Data Structures\n2. Algorithms and Theory of Computation\n3. Operating Systems, Networks and Databases\n4. AI, ML and Cloud electives\n5. A final-year major project";
const CONTACT: &str = "You can reach the CSE department office in the Academic Block during working hours, or use the contact form on the official MUJ website.";

const CSE_FALLBACK: &str =
    "I'm not sure about that. Did you mean to ask about the admission process?";

const CAMPUS_ADMISSION_Q: &str = "Tell me about the admission process at Manipal University Jaipur";
const CAMPUS_FEES_Q: &str = "What are the fee details for different programs at MUJ?";
const CAMPUS_MAP_Q: &str = "Can you help me navigate the MUJ campus?";
const CAMPUS_HOSTELS_Q: &str = "What are the hostel facilities available at MUJ?";
const CAMPUS_CALENDAR_Q: &str = "Tell me about the academic calendar";
const CAMPUS_COURSES_Q: &str = "What courses are offered at MUJ?";

const CAMPUS_ADMISSION: &str = "The admission process at MUJ involves:\n1. Online application submission\n2. Entrance exam (if applicable)\n3. Document verification\n4. Fee payment\nFor specific programs, please visit the official website or contact the admissions office.";
const CAMPUS_FEES: &str = "Fee structure varies by program:\n- B.Tech: ₹2.5-3.5L per year\n- BBA: ₹2-2.5L per year\n- B.Arch: ₹2.8-3.2L per year\nPlease note these are approximate figures. Contact the fee department for exact details.";
const CAMPUS_MAP: &str = "MUJ campus has clearly marked buildings and directions:\n- Academic Block (A-F)\n- Central Library\n- Student Center\n- Sports Complex\n- Hostels\nYou can get a printed map from the information desk at the main entrance.";
const CAMPUS_HOSTELS: &str = "MUJ offers excellent hostel facilities:\n- Separate hostels for boys and girls\n- AC/Non-AC rooms\n- 24/7 security\n- Mess facility\n- Wi-Fi connectivity\n- Laundry service\n- Medical facility";
const CAMPUS_CALENDAR: &str = "The academic year typically includes:\n- Odd Semester: July-December\n- Even Semester: January-May\n- Mid-semester breaks\n- Winter and Summer vacations\nCheck the official website for exact dates.";
const CAMPUS_COURSES: &str = "MUJ offers various programs:\n- Engineering (B.Tech, M.Tech)\n- Management (BBA, MBA)\n- Architecture (B.Arch)\n- Design (B.Des)\n- Law (LLB, LLM)\n- Sciences\n- Humanities\nVisit the website for a complete list of courses.";

const CAMPUS_FALLBACK: &str = "I'm still learning about that. Please contact the university administration for accurate information.";
const CAMPUS_GREETING: &str = "Hello! I'm your MUJ assistant. How can I help you today?";

/// Selects one of the built-in catalogs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogPreset {
    /// CSE department assistant with the confirmation fallback
    #[default]
    Cse,
    /// Campus-wide guide keyed by full questions
    Campus,
}

impl CatalogPreset {
    pub fn catalog(self) -> Result<ResponseCatalog, CatalogError> {
        match self {
            CatalogPreset::Cse => cse_department(),
            CatalogPreset::Campus => campus_guide(),
        }
    }
}

impl fmt::Display for CatalogPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogPreset::Cse => write!(f, "cse"),
            CatalogPreset::Campus => write!(f, "campus"),
        }
    }
}

impl FromStr for CatalogPreset {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cse" => Ok(CatalogPreset::Cse),
            "campus" => Ok(CatalogPreset::Campus),
            other => Err(CatalogError::UnknownPreset(other.to_string())),
        }
    }
}

fn cse_department() -> Result<ResponseCatalog, CatalogError> {
    let topics = [
        ("Admission Process", ADMISSION_PROCESS),
        ("Fee Structure", FEE_STRUCTURE),
        ("Course Duration", COURSE_DURATION),
        ("Placement Statistics", PLACEMENT_STATISTICS),
        ("Faculty Information", FACULTY_INFORMATION),
        ("Infrastructure", INFRASTRUCTURE),
    ];

    let builder = topics
        .iter()
        .fold(ResponseCatalog::builder(CSE_FALLBACK), |b, (topic, response)| {
            b.quick_action(*topic, *topic).exact(*topic, *response)
        });

    builder
        .substring("programs offer", PROGRAMS_OFFERED)
        .substring("admission", ADMISSION_PROCESS)
        .substring("eligibility", ELIGIBILITY)
        .substring("fee", FEE_STRUCTURE)
        .substring("scholarship", SCHOLARSHIPS)
        .substring("duration", COURSE_DURATION)
        .substring("placement", PLACEMENT_STATISTICS)
        .substring("faculty", FACULTY_INFORMATION)
        .substring("infrastructure", INFRASTRUCTURE)
        .substring("hostel", HOSTELS)
        .substring("syllabus", SYLLABUS)
        .substring("contact", CONTACT)
        .fallback_is_confirmation_prompt(true)
        .assumed_intent("Admission Process")
        .build()
}

fn campus_guide() -> Result<ResponseCatalog, CatalogError> {
    let links = [
        ("Admission", CAMPUS_ADMISSION_Q, CAMPUS_ADMISSION),
        ("Fees", CAMPUS_FEES_Q, CAMPUS_FEES),
        ("Campus Map", CAMPUS_MAP_Q, CAMPUS_MAP),
        ("Hostels", CAMPUS_HOSTELS_Q, CAMPUS_HOSTELS),
        ("Schedule", CAMPUS_CALENDAR_Q, CAMPUS_CALENDAR),
        ("Courses", CAMPUS_COURSES_Q, CAMPUS_COURSES),
    ];
    // "campus" occurs in most questions, so it goes last
    let keywords = [
        ("admission", CAMPUS_ADMISSION),
        ("fee", CAMPUS_FEES),
        ("hostel", CAMPUS_HOSTELS),
        ("calendar", CAMPUS_CALENDAR),
        ("course", CAMPUS_COURSES),
        ("campus", CAMPUS_MAP),
    ];

    // Full questions first so a typed quick-link question gets its own answer
    let builder = links.iter().fold(
        ResponseCatalog::builder(CAMPUS_FALLBACK),
        |b, (label, question, response)| {
            b.quick_action(*label, *question)
                .exact(*question, *response)
                .substring(*question, *response)
        },
    );

    keywords
        .iter()
        .fold(builder, |b, (keyword, response)| b.substring(*keyword, *response))
        .fallback_is_confirmation_prompt(false)
        .assumed_intent(CAMPUS_ADMISSION_Q)
        .greeting(CAMPUS_GREETING)
        .build()
}
