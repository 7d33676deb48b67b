//! Read-only ISO 3166-1 reference table.

use serde::Serialize;

/// One country table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Country {
    pub name: &'static str,
    pub two_letter_code: &'static str,
    pub three_letter_code: &'static str,
    pub numeric_code: &'static str,
}

const fn country(
    name: &'static str,
    two_letter_code: &'static str,
    three_letter_code: &'static str,
    numeric_code: &'static str,
) -> Country {
    Country {
        name,
        two_letter_code,
        three_letter_code,
        numeric_code,
    }
}

/// Number of entries in the table.
pub const COUNTRY_COUNT: usize = 250;

static COUNTRIES: [Country; COUNTRY_COUNT] = [
    country("Aaland Islands", "AX", "ALA", "248"),
    country("Afghanistan", "AF", "AFG", "004"),
    country("Albania", "AL", "ALB", "008"),
    country("Algeria", "DZ", "DZA", "012"),
    country("American Samoa", "AS", "ASM", "016"),
    country("Andorra", "AD", "AND", "020"),
    country("Angola", "AO", "AGO", "024"),
    country("Anguilla", "AI", "AIA", "660"),
    country("Antarctica", "AQ", "ATA", "010"),
    country("Antigua and Barbuda", "AG", "ATG", "028"),
    country("Argentina", "AR", "ARG", "032"),
    country("Armenia", "AM", "ARM", "051"),
    country("Aruba", "AW", "ABW", "533"),
    country("Australia", "AU", "AUS", "036"),
    country("Austria", "AT", "AUT", "040"),
    country("Azerbaijan", "AZ", "AZE", "031"),
    country("Bahamas", "BS", "BHS", "044"),
    country("Bahrain", "BH", "BHR", "048"),
    country("Bangladesh", "BD", "BGD", "050"),
    country("Barbados", "BB", "BRB", "052"),
    country("Belarus", "BY", "BLR", "112"),
    country("Belgium", "BE", "BEL", "056"),
    country("Belize", "BZ", "BLZ", "084"),
    country("Benin", "BJ", "BEN", "204"),
    country("Bermuda", "BM", "BMU", "060"),
    country("Bhutan", "BT", "BTN", "064"),
    country("Bolivia", "BO", "BOL", "068"),
    country("Bonaire, Sint Eustatius and Saba", "BQ", "BES", "535"),
    country("Bosnia and Herzegovina", "BA", "BIH", "070"),
    country("Botswana", "BW", "BWA", "072"),
    country("Bouvet Island", "BV", "BVT", "074"),
    country("Brazil", "BR", "BRA", "076"),
    country("British Indian Ocean Territory", "IO", "IOT", "086"),
    country("Brunei Darussalam", "BN", "BRN", "096"),
    country("Bulgaria", "BG", "BGR", "100"),
    country("Burkina Faso", "BF", "BFA", "854"),
    country("Burundi", "BI", "BDI", "108"),
    country("Cambodia", "KH", "KHM", "116"),
    country("Cameroon", "CM", "CMR", "120"),
    country("Canada", "CA", "CAN", "124"),
    country("Cape Verde", "CV", "CPV", "132"),
    country("Cayman Islands", "KY", "CYM", "136"),
    country("Central African Republic", "CF", "CAF", "140"),
    country("Chad", "TD", "TCD", "148"),
    country("Chile", "CL", "CHL", "152"),
    country("China", "CN", "CHN", "156"),
    country("Christmas Island", "CX", "CXR", "162"),
    country("Cocos (Keeling) Islands", "CC", "CCK", "166"),
    country("Colombia", "CO", "COL", "170"),
    country("Comoros", "KM", "COM", "174"),
    country("Congo", "CG", "COG", "178"),
    country("Congo, the Democratic Republic of the", "CD", "COD", "180"),
    country("Cook Islands", "CK", "COK", "184"),
    country("Costa Rica", "CR", "CRI", "188"),
    country("Cote d'Ivoire", "CI", "CIV", "384"),
    country("Croatia", "HR", "HRV", "191"),
    country("Cuba", "CU", "CUB", "192"),
    country("Curacao", "CW", "CUW", "531"),
    country("Cyprus", "CY", "CYP", "196"),
    country("Czech Republic", "CZ", "CZE", "203"),
    country("Denmark", "DK", "DNK", "208"),
    country("Djibouti", "DJ", "DJI", "262"),
    country("Dominica", "DM", "DMA", "212"),
    country("Dominican Republic", "DO", "DOM", "214"),
    country("Ecuador", "EC", "ECU", "218"),
    country("Egypt", "EG", "EGY", "818"),
    country("El Salvador", "SV", "SLV", "222"),
    country("Equatorial Guinea", "GQ", "GNQ", "226"),
    country("Eritrea", "ER", "ERI", "232"),
    country("Estonia", "EE", "EST", "233"),
    country("Eswatini", "SZ", "SWZ", "748"),
    country("Ethiopia", "ET", "ETH", "231"),
    country("Falkland Islands (Malvinas)", "FK", "FLK", "238"),
    country("Faroe Islands", "FO", "FRO", "234"),
    country("Fiji", "FJ", "FJI", "242"),
    country("Finland", "FI", "FIN", "246"),
    country("France", "FR", "FRA", "250"),
    country("French Guiana", "GF", "GUF", "254"),
    country("French Polynesia", "PF", "PYF", "258"),
    country("French Southern Territories", "TF", "ATF", "260"),
    country("Gabon", "GA", "GAB", "266"),
    country("Gambia", "GM", "GMB", "270"),
    country("Georgia", "GE", "GEO", "268"),
    country("Germany", "DE", "DEU", "276"),
    country("Ghana", "GH", "GHA", "288"),
    country("Gibraltar", "GI", "GIB", "292"),
    country("Greece", "GR", "GRC", "300"),
    country("Greenland", "GL", "GRL", "304"),
    country("Grenada", "GD", "GRD", "308"),
    country("Guadeloupe", "GP", "GLP", "312"),
    country("Guam", "GU", "GUM", "316"),
    country("Guatemala", "GT", "GTM", "320"),
    country("Guernsey", "GG", "GGY", "831"),
    country("Guinea", "GN", "GIN", "324"),
    country("Guinea-Bissau", "GW", "GNB", "624"),
    country("Guyana", "GY", "GUY", "328"),
    country("Haiti", "HT", "HTI", "332"),
    country("Heard Island and McDonald Islands", "HM", "HMD", "334"),
    country("Holy See (Vatican City State)", "VA", "VAT", "336"),
    country("Honduras", "HN", "HND", "340"),
    country("Hong Kong", "HK", "HKG", "344"),
    country("Hungary", "HU", "HUN", "348"),
    country("Iceland", "IS", "ISL", "352"),
    country("India", "IN", "IND", "356"),
    country("Indonesia", "ID", "IDN", "360"),
    country("Iran, Islamic Republic of", "IR", "IRN", "364"),
    country("Iraq", "IQ", "IRQ", "368"),
    country("Ireland", "IE", "IRL", "372"),
    country("Isle of Man", "IM", "IMN", "833"),
    country("Israel", "IL", "ISR", "376"),
    country("Italy", "IT", "ITA", "380"),
    country("Jamaica", "JM", "JAM", "388"),
    country("Japan", "JP", "JPN", "392"),
    country("Jersey", "JE", "JEY", "832"),
    country("Jordan", "JO", "JOR", "400"),
    country("Kazakhstan", "KZ", "KAZ", "398"),
    country("Kenya", "KE", "KEN", "404"),
    country("Kiribati", "KI", "KIR", "296"),
    country("Korea, Democratic People's Republic of", "KP", "PRK", "408"),
    country("Korea, Republic of", "KR", "KOR", "410"),
    country("Kuwait", "KW", "KWT", "414"),
    country("Kyrgyzstan", "KG", "KGZ", "417"),
    country("Lao People's Democratic Republic", "LA", "LAO", "418"),
    country("Latvia", "LV", "LVA", "428"),
    country("Lebanon", "LB", "LBN", "422"),
    country("Lesotho", "LS", "LSO", "426"),
    country("Liberia", "LR", "LBR", "430"),
    country("Libya", "LY", "LBY", "434"),
    country("Liechtenstein", "LI", "LIE", "438"),
    country("Lithuania", "LT", "LTU", "440"),
    country("Luxembourg", "LU", "LUX", "442"),
    country("Macao", "MO", "MAC", "446"),
    country("Madagascar", "MG", "MDG", "450"),
    country("Malawi", "MW", "MWI", "454"),
    country("Malaysia", "MY", "MYS", "458"),
    country("Maldives", "MV", "MDV", "462"),
    country("Mali", "ML", "MLI", "466"),
    country("Malta", "MT", "MLT", "470"),
    country("Marshall Islands", "MH", "MHL", "584"),
    country("Martinique", "MQ", "MTQ", "474"),
    country("Mauritania", "MR", "MRT", "478"),
    country("Mauritius", "MU", "MUS", "480"),
    country("Mayotte", "YT", "MYT", "175"),
    country("Mexico", "MX", "MEX", "484"),
    country("Micronesia, Federated States of", "FM", "FSM", "583"),
    country("Moldova, Republic of", "MD", "MDA", "498"),
    country("Monaco", "MC", "MCO", "492"),
    country("Mongolia", "MN", "MNG", "496"),
    country("Montenegro", "ME", "MNE", "499"),
    country("Montserrat", "MS", "MSR", "500"),
    country("Morocco", "MA", "MAR", "504"),
    country("Mozambique", "MZ", "MOZ", "508"),
    country("Myanmar", "MM", "MMR", "104"),
    country("Namibia", "NA", "NAM", "516"),
    country("Nauru", "NR", "NRU", "520"),
    country("Nepal", "NP", "NPL", "524"),
    country("Netherlands", "NL", "NLD", "528"),
    country("Netherlands Antilles", "AN", "ANT", "530"),
    country("New Caledonia", "NC", "NCL", "540"),
    country("New Zealand", "NZ", "NZL", "554"),
    country("Nicaragua", "NI", "NIC", "558"),
    country("Niger", "NE", "NER", "562"),
    country("Nigeria", "NG", "NGA", "566"),
    country("Niue", "NU", "NIU", "570"),
    country("Norfolk Island", "NF", "NFK", "574"),
    country("North Macedonia", "MK", "MKD", "807"),
    country("Northern Mariana Islands", "MP", "MNP", "580"),
    country("Norway", "NO", "NOR", "578"),
    country("Oman", "OM", "OMN", "512"),
    country("Pakistan", "PK", "PAK", "586"),
    country("Palau", "PW", "PLW", "585"),
    country("Palestine, State of", "PS", "PSE", "275"),
    country("Panama", "PA", "PAN", "591"),
    country("Papua New Guinea", "PG", "PNG", "598"),
    country("Paraguay", "PY", "PRY", "600"),
    country("Peru", "PE", "PER", "604"),
    country("Philippines", "PH", "PHL", "608"),
    country("Pitcairn", "PN", "PCN", "612"),
    country("Poland", "PL", "POL", "616"),
    country("Portugal", "PT", "PRT", "620"),
    country("Puerto Rico", "PR", "PRI", "630"),
    country("Qatar", "QA", "QAT", "634"),
    country("Reunion", "RE", "REU", "638"),
    country("Romania", "RO", "ROU", "642"),
    country("Russian Federation", "RU", "RUS", "643"),
    country("Rwanda", "RW", "RWA", "646"),
    country("Saint Barthelemy", "BL", "BLM", "652"),
    country("Saint Helena, Ascension and Tristan da Cunha", "SH", "SHN", "654"),
    country("Saint Kitts and Nevis", "KN", "KNA", "659"),
    country("Saint Lucia", "LC", "LCA", "662"),
    country("Saint Martin (French part)", "MF", "MAF", "663"),
    country("Saint Pierre and Miquelon", "PM", "SPM", "666"),
    country("Saint Vincent and the Grenadines", "VC", "VCT", "670"),
    country("Samoa", "WS", "WSM", "882"),
    country("San Marino", "SM", "SMR", "674"),
    country("Sao Tome and Principe", "ST", "STP", "678"),
    country("Saudi Arabia", "SA", "SAU", "682"),
    country("Senegal", "SN", "SEN", "686"),
    country("Serbia", "RS", "SRB", "688"),
    country("Seychelles", "SC", "SYC", "690"),
    country("Sierra Leone", "SL", "SLE", "694"),
    country("Singapore", "SG", "SGP", "702"),
    country("Sint Maarten (Dutch part)", "SX", "SXM", "534"),
    country("Slovakia", "SK", "SVK", "703"),
    country("Slovenia", "SI", "SVN", "705"),
    country("Solomon Islands", "SB", "SLB", "090"),
    country("Somalia", "SO", "SOM", "706"),
    country("South Africa", "ZA", "ZAF", "710"),
    country("South Georgia and the South Sandwich Islands", "GS", "SGS", "239"),
    country("South Sudan", "SS", "SSD", "728"),
    country("Spain", "ES", "ESP", "724"),
    country("Sri Lanka", "LK", "LKA", "144"),
    country("Sudan", "SD", "SDN", "729"),
    country("Suriname", "SR", "SUR", "740"),
    country("Svalbard and Jan Mayen", "SJ", "SJM", "744"),
    country("Sweden", "SE", "SWE", "752"),
    country("Switzerland", "CH", "CHE", "756"),
    country("Syrian Arab Republic", "SY", "SYR", "760"),
    country("Taiwan, Province of China", "TW", "TWN", "158"),
    country("Tajikistan", "TJ", "TJK", "762"),
    country("Tanzania, United Republic of", "TZ", "TZA", "834"),
    country("Thailand", "TH", "THA", "764"),
    country("Timor-Leste", "TL", "TLS", "626"),
    country("Togo", "TG", "TGO", "768"),
    country("Tokelau", "TK", "TKL", "772"),
    country("Tonga", "TO", "TON", "776"),
    country("Trinidad and Tobago", "TT", "TTO", "780"),
    country("Tunisia", "TN", "TUN", "788"),
    country("Turkey", "TR", "TUR", "792"),
    country("Turkmenistan", "TM", "TKM", "795"),
    country("Turks and Caicos Islands", "TC", "TCA", "796"),
    country("Tuvalu", "TV", "TUV", "798"),
    country("Uganda", "UG", "UGA", "800"),
    country("Ukraine", "UA", "UKR", "804"),
    country("United Arab Emirates", "AE", "ARE", "784"),
    country("United Kingdom", "GB", "GBR", "826"),
    country("United States", "US", "USA", "840"),
    country("United States Minor Outlying Islands", "UM", "UMI", "581"),
    country("Uruguay", "UY", "URY", "858"),
    country("Uzbekistan", "UZ", "UZB", "860"),
    country("Vanuatu", "VU", "VUT", "548"),
    country("Venezuela", "VE", "VEN", "862"),
    country("Viet Nam", "VN", "VNM", "704"),
    country("Virgin Islands, British", "VG", "VGB", "092"),
    country("Virgin Islands, U.S.", "VI", "VIR", "850"),
    country("Wallis and Futuna", "WF", "WLF", "876"),
    country("Western Sahara", "EH", "ESH", "732"),
    country("Yemen", "YE", "YEM", "887"),
    country("Zambia", "ZM", "ZMB", "894"),
    country("Zimbabwe", "ZW", "ZWE", "716"),
];

/// Every entry, sorted by name.
pub fn all() -> &'static [Country] {
    &COUNTRIES
}

pub fn two_letter_codes() -> impl Iterator<Item = &'static str> {
    COUNTRIES.iter().map(|country| country.two_letter_code)
}

pub fn three_letter_codes() -> impl Iterator<Item = &'static str> {
    COUNTRIES.iter().map(|country| country.three_letter_code)
}

pub fn numeric_codes() -> impl Iterator<Item = &'static str> {
    COUNTRIES.iter().map(|country| country.numeric_code)
}

pub fn names() -> impl Iterator<Item = &'static str> {
    COUNTRIES.iter().map(|country| country.name)
}

/// Exact (case-sensitive) alpha-2 membership.
pub fn is_two_letter_code(code: &str) -> bool {
    COUNTRIES.iter().any(|country| country.two_letter_code == code)
}

/// Look up an entry by alpha-2, alpha-3 or numeric code. Letters match case-insensitively.
pub fn find(code: &str) -> Option<&'static Country> {
    let code = code.trim();
    COUNTRIES.iter().find(|country| {
        country.two_letter_code.eq_ignore_ascii_case(code)
            || country.three_letter_code.eq_ignore_ascii_case(code)
            || country.numeric_code == code
    })
}
